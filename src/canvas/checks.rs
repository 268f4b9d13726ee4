use super::{CanvasModel, CanvasNode};
use crate::parameters::property_references;
use crate::schema::{NodeDefinition, PropertyDefinition, SchemaRegistry};
use crate::topology::PropertyValue;
use crate::validation::{ValidationError, ValidationErrorKind, keys};
use ahash::AHashMap;
use std::collections::BTreeMap;

impl CanvasModel {
    /// Structural problems of this snapshot: nodes first, in canvas order, then edges.
    ///
    /// `declared_parameters` are the parameter names property values may reference.
    pub fn structural_errors(
        &self,
        registry: &SchemaRegistry,
        declared_parameters: &[&str],
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut name_counts: AHashMap<&str, usize> = AHashMap::new();
        for node in &self.nodes {
            *name_counts.entry(node.name.as_str()).or_default() += 1;
        }

        for node in &self.nodes {
            if node.name.trim().is_empty() {
                // Nameless nodes are attributed by canvas id.
                errors.push(
                    ValidationError::missing_field(keys::PROPERTY_MISSING)
                        .on_node(node.id.clone())
                        .at(["name"]),
                );
            } else if name_counts.get(node.name.as_str()).copied().unwrap_or(0) > 1 {
                errors.push(
                    ValidationError::new(
                        ValidationErrorKind::NameAlreadyInUse,
                        keys::NODE_NAME_DUPLICATE,
                    )
                    .on_node(node.name.clone())
                    .at(["name"]),
                );
            }

            if let Some(definition) = registry.node_definition(&node.node_type) {
                missing_properties(node, definition, &mut errors);
                check_values(
                    &node.name,
                    &node.properties,
                    &definition.properties,
                    &mut Vec::new(),
                    &mut errors,
                );
            }

            for (path, parameter) in property_references(&node.properties) {
                if !declared_parameters.contains(&parameter.as_str()) {
                    errors.push(
                        ValidationError::missing_field(keys::PARAMETER_UNDECLARED)
                            .on_node(node.name.clone())
                            .at(path),
                    );
                }
            }
        }

        for edge in &self.edges {
            let shared = self.shared_types(edge);
            let effective = edge.effective_types(&shared);
            if shared.is_empty() || effective.is_empty() || !effective.is_within(&shared) {
                let source = self
                    .node(&edge.source)
                    .map_or_else(|| edge.source.clone(), |node| node.name.clone());
                let mut error =
                    ValidationError::type_mismatch(keys::EDGE_TYPE_MISMATCH).at(["inputs".to_string(), source]);
                error.node_name = self.node(&edge.target).map(|node| node.name.clone());
                errors.push(error);
            }
        }

        errors
    }
}

fn missing_properties(node: &CanvasNode, definition: &NodeDefinition, errors: &mut Vec<ValidationError>) {
    let mut reported: Vec<Vec<String>> = Vec::new();
    for path in definition.required_paths() {
        if path.len() == 1
            && (path[0] == definition.display_name || path[0] == "@type" || path[0] == "inputs")
        {
            continue;
        }
        if reported.iter().any(|missing| path.starts_with(missing)) {
            continue;
        }
        if covered_by_parameter(node, &path) {
            continue;
        }
        let present = node.property(&path).is_some_and(|value| !value.is_empty());
        if !present {
            errors.push(
                ValidationError::missing_field(keys::PROPERTY_MISSING)
                    .on_node(node.name.clone())
                    .at(path.clone()),
            );
            reported.push(path);
        }
    }
}

/// Whether an enclosing object of `path` is itself supplied by a parameter.
fn covered_by_parameter(node: &CanvasNode, path: &[String]) -> bool {
    (1..path.len()).any(|end| {
        matches!(node.property(&path[..end]), Some(PropertyValue::Parameter(_)))
    })
}

fn check_values(
    node_name: &str,
    values: &BTreeMap<String, PropertyValue>,
    definitions: &BTreeMap<String, PropertyDefinition>,
    prefix: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    for (key, value) in values {
        let Some(definition) = definitions.get(key) else {
            continue;
        };
        prefix.push(key.clone());
        if !definition.property_type.accepts(value) {
            errors.push(
                ValidationError::type_mismatch(keys::PROPERTY_TYPE_MISMATCH)
                    .on_node(node_name)
                    .at(prefix.clone()),
            );
        } else if !definition.allows(value) {
            errors.push(
                ValidationError::type_mismatch(keys::PROPERTY_NOT_ALLOWED)
                    .on_node(node_name)
                    .at(prefix.clone()),
            );
        } else if let PropertyValue::Object(inner) = value {
            check_values(node_name, inner, &definition.properties, prefix, errors);
        }
        prefix.pop();
    }
}
