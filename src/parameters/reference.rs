use crate::topology::{PropertyValue, TopologyDocument};
use serde::Serialize;
use std::collections::BTreeMap;

/// A node property whose value is a `${name}` parameter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterReference {
    pub node_name: String,
    pub property: Vec<String>,
    pub parameter: String,
}

/// Every `(property path, parameter name)` reference in one node's property bag.
pub fn property_references(properties: &BTreeMap<String, PropertyValue>) -> Vec<(Vec<String>, String)> {
    let mut found = Vec::new();
    for (key, value) in properties {
        value.collect_references(&mut vec![key.clone()], &mut found);
    }
    found
}

/// Every parameter reference in `topology`, in node declaration order.
pub fn references(topology: &TopologyDocument) -> Vec<ParameterReference> {
    topology
        .nodes()
        .flat_map(|(_, node)| {
            property_references(&node.properties)
                .into_iter()
                .map(move |(property, parameter)| ParameterReference {
                    node_name: node.name.clone(),
                    property,
                    parameter,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{NodeDescriptor, NodeKind};

    #[test]
    fn nested_references_carry_their_full_path() {
        let mut credentials = BTreeMap::new();
        credentials.insert("password".to_string(), PropertyValue::parameter("pw"));
        let mut endpoint = BTreeMap::new();
        endpoint.insert("url".to_string(), PropertyValue::parameter("url"));
        endpoint.insert("credentials".to_string(), PropertyValue::Object(credentials));

        let topology = TopologyDocument::new("t").add_node(
            NodeKind::Source,
            NodeDescriptor::new("camera", "cam").with_property("endpoint", PropertyValue::Object(endpoint)),
        );

        let found = references(&topology);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].property, vec!["endpoint", "credentials", "password"]);
        assert_eq!(found[1].parameter, "url");
    }
}
