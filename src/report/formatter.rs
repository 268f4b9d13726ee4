use crate::validation::{ValidationError, ValidationErrorKind};
use itertools::Itertools;

/// Formats validation errors into human-readable text.
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// The aggregate count shown next to the save button; `None` when there is nothing to show.
    pub fn summary(errors: &[ValidationError]) -> Option<String> {
        match errors.len() {
            0 => None,
            1 => Some("1 validation error".to_string()),
            n => Some(format!("{} validation errors", n)),
        }
    }

    /// One line for one error: where it is, then what it is.
    pub fn format_error(error: &ValidationError) -> String {
        let location = match (&error.node_name, error.property.is_empty()) {
            (Some(node), true) => format!("node '{}'", node),
            (Some(node), false) => format!("node '{}', property '{}'", node, error.property.join(".")),
            (None, false) => format!("'{}'", error.property.join(".")),
            (None, true) => "topology".to_string(),
        };
        format!("{} at {}: {}", Self::format_kind(error.kind), location, error.description)
    }

    /// The summary line followed by every error, grouped by node in first-seen order.
    pub fn format_report(errors: &[ValidationError]) -> String {
        let Some(summary) = Self::summary(errors) else {
            return "No validation errors".to_string();
        };
        let mut lines = vec![summary];
        let groups = errors
            .iter()
            .into_group_map_by(|error| error.node_name.as_deref());
        let order = errors.iter().map(|error| error.node_name.as_deref()).unique();
        for node in order {
            if let Some(group) = groups.get(&node) {
                lines.extend(group.iter().map(|error| format!("  - {}", Self::format_error(error))));
            }
        }
        lines.join("\n")
    }

    fn format_kind(kind: ValidationErrorKind) -> &'static str {
        match kind {
            ValidationErrorKind::MissingField => "Missing field",
            ValidationErrorKind::NameAlreadyInUse => "Name already in use",
            ValidationErrorKind::TypeMismatch => "Type mismatch",
            ValidationErrorKind::ServerError => "Server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::keys;

    #[test]
    fn summary_counts_errors() {
        let error = ValidationError::missing_field(keys::TOPOLOGY_NAME_MISSING).at(["name"]);
        assert_eq!(ErrorFormatter::summary(&[]), None);
        assert_eq!(ErrorFormatter::summary(&[error.clone()]).as_deref(), Some("1 validation error"));
        assert_eq!(
            ErrorFormatter::summary(&[error.clone(), error]).as_deref(),
            Some("2 validation errors")
        );
    }

    #[test]
    fn errors_are_grouped_by_node() {
        let errors = vec![
            ValidationError::missing_field(keys::PROPERTY_MISSING).on_node("cam").at(["endpoint"]),
            ValidationError::missing_field(keys::TOPOLOGY_NAME_MISSING).at(["name"]),
            ValidationError::type_mismatch(keys::PROPERTY_NOT_ALLOWED).on_node("cam").at(["transport"]),
        ];
        let report = ErrorFormatter::format_report(&errors);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "3 validation errors");
        assert_eq!(
            lines[1],
            "  - Missing field at node 'cam', property 'endpoint': nodePropertyMissing"
        );
        assert!(lines[2].contains("transport"));
        assert!(lines[3].starts_with("  - Missing field at 'name'"));
    }
}
