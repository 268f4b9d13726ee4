//! The ordered battery of checks run before a document may be saved or activated.
//!
//! A pass never fails: it returns the (possibly empty) list of problems found in
//! the candidate, and the absence of errors is the only success signal.

use crate::canvas::CanvasModel;
use crate::host::PageType;
use crate::parameters::ParameterSet;
use crate::schema::SchemaRegistry;
use itertools::Itertools;
use tracing::debug;

pub mod error;
pub mod name;

pub use error::*;
pub use name::{NameAvailability, NameCheck};

/// Everything one validation pass looks at.
#[derive(Debug, Clone)]
pub struct ValidationCandidate<'a> {
    pub page: PageType,
    pub name: &'a str,
    pub canvas: &'a CanvasModel,
    pub registry: &'a SchemaRegistry,
    /// Parameter names node properties may reference.
    pub declared_parameters: Vec<&'a str>,
    /// Bound values, checked for activation on instance pages.
    pub parameters: Option<&'a ParameterSet>,
    /// Whether remote name-availability answers are consulted.
    pub check_name: bool,
}

impl<'a> ValidationCandidate<'a> {
    pub fn topology(
        name: &'a str,
        canvas: &'a CanvasModel,
        registry: &'a SchemaRegistry,
        declared_parameters: Vec<&'a str>,
    ) -> Self {
        Self {
            page: PageType::Topology,
            name,
            canvas,
            registry,
            declared_parameters,
            parameters: None,
            check_name: true,
        }
    }

    pub fn instance(
        name: &'a str,
        canvas: &'a CanvasModel,
        registry: &'a SchemaRegistry,
        parameters: &'a ParameterSet,
    ) -> Self {
        Self {
            page: PageType::Instance,
            name,
            canvas,
            registry,
            declared_parameters: parameters.names(),
            parameters: Some(parameters),
            check_name: false,
        }
    }

    pub fn with_name_check(mut self, check_name: bool) -> Self {
        self.check_name = check_name;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    names: NameAvailability,
    errors: Vec<ValidationError>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every check against `candidate` and replaces the current error list.
    ///
    /// `external` errors come from a rejected save and only survive this pass.
    pub fn validate(
        &mut self,
        candidate: &ValidationCandidate<'_>,
        external: Option<Vec<ServerError>>,
    ) -> &[ValidationError] {
        let mut errors = Vec::new();

        if candidate.name.trim().is_empty() {
            let key = match candidate.page {
                PageType::Topology => keys::TOPOLOGY_NAME_MISSING,
                PageType::Instance => keys::INSTANCE_NAME_MISSING,
            };
            errors.push(ValidationError::missing_field(key).at(["name"]));
        } else if candidate.check_name && self.names.known(candidate.name) == Some(false) {
            errors.push(
                ValidationError::new(ValidationErrorKind::NameAlreadyInUse, keys::NAME_NOT_AVAILABLE)
                    .at(["name"]),
            );
        }

        errors.extend(
            candidate
                .canvas
                .structural_errors(candidate.registry, &candidate.declared_parameters),
        );
        if let (PageType::Instance, Some(parameters)) = (candidate.page, candidate.parameters) {
            errors.extend(parameters.activation_errors());
        }

        let external_count = external.as_ref().map_or(0, Vec::len);
        errors.extend(external.into_iter().flatten().map(ValidationError::from));

        self.errors = errors
            .into_iter()
            .unique_by(ValidationError::identity)
            .collect();
        debug!(
            name = candidate.name,
            revision = candidate.canvas.revision(),
            external = external_count,
            errors = self.errors.len(),
            "Validation pass complete"
        );
        &self.errors
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn names(&self) -> &NameAvailability {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameAvailability {
        &mut self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Position;

    fn canvas() -> CanvasModel {
        let registry = SchemaRegistry::new();
        let (canvas, _) = CanvasModel::new().with_node(&registry, "custom", "a", None, Position::default());
        canvas
    }

    #[test]
    fn empty_name_is_the_only_error_of_an_empty_canvas() {
        let registry = SchemaRegistry::new();
        let canvas = CanvasModel::new();
        let mut engine = ValidationEngine::new();
        let errors = engine.validate(&ValidationCandidate::topology("", &canvas, &registry, vec![]), None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingField);
        assert_eq!(errors[0].property, vec!["name"]);
    }

    #[test]
    fn external_errors_last_one_pass() {
        let registry = SchemaRegistry::new();
        let canvas = canvas();
        let candidate = ValidationCandidate::topology("pipeline", &canvas, &registry, vec![]);
        let mut engine = ValidationEngine::new();

        let errors = engine.validate(&candidate, Some(vec![ServerError::new("quota exceeded")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ServerError);
        assert!(engine.validate(&candidate, None).is_empty());
    }

    #[test]
    fn duplicate_errors_collapse() {
        let registry = SchemaRegistry::new();
        let canvas = canvas();
        let candidate = ValidationCandidate::topology("pipeline", &canvas, &registry, vec![]);
        let duplicate = ServerError {
            value: "conflict".to_string(),
            node_name: Some("a".to_string()),
            node_property: Some("name".to_string()),
        };
        let mut engine = ValidationEngine::new();
        let errors = engine.validate(&candidate, Some(vec![duplicate.clone(), duplicate]));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unavailable_name_is_reported_until_it_changes() {
        let registry = SchemaRegistry::new();
        let canvas = canvas();
        let mut engine = ValidationEngine::new();
        engine.names_mut().begin("pipeline1");
        engine.names_mut().resolve("pipeline1", false);

        let first = ValidationCandidate::topology("pipeline1", &canvas, &registry, vec![]);
        assert_eq!(
            engine.validate(&first, None)[0].kind,
            ValidationErrorKind::NameAlreadyInUse
        );
        let second = ValidationCandidate::topology("pipeline2", &canvas, &registry, vec![]);
        assert!(engine.validate(&second, None).is_empty());
    }
}
