use serde::{Deserialize, Serialize};

/// The set of data-type labels a port or a connection admits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeSet {
    /// Admits every label. Used for node types the registry does not know.
    Any,
    /// Admits exactly these labels, in declaration order.
    Only(Vec<String>),
}

impl TypeSet {
    pub fn only<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeSet::Only(labels.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        TypeSet::Only(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TypeSet::Only(labels) if labels.is_empty())
    }

    pub fn contains(&self, label: &str) -> bool {
        match self {
            TypeSet::Any => true,
            TypeSet::Only(labels) => labels.iter().any(|l| l == label),
        }
    }

    /// Labels shared by both sets, keeping the order of `self`.
    pub fn intersect(&self, other: &TypeSet) -> TypeSet {
        match (self, other) {
            (TypeSet::Any, other) => other.clone(),
            (this, TypeSet::Any) => this.clone(),
            (TypeSet::Only(labels), other) => TypeSet::Only(
                labels
                    .iter()
                    .filter(|label| other.contains(label))
                    .cloned()
                    .collect(),
            ),
        }
    }

    pub fn union(&self, other: &TypeSet) -> TypeSet {
        match (self, other) {
            (TypeSet::Any, _) | (_, TypeSet::Any) => TypeSet::Any,
            (TypeSet::Only(left), TypeSet::Only(right)) => {
                let mut labels = left.clone();
                labels.extend(right.iter().filter(|l| !left.contains(l)).cloned());
                TypeSet::Only(labels)
            }
        }
    }

    /// Whether every label of `self` is admitted by `other`.
    pub fn is_within(&self, other: &TypeSet) -> bool {
        match (self, other) {
            (_, TypeSet::Any) => true,
            (TypeSet::Any, TypeSet::Only(_)) => false,
            (TypeSet::Only(labels), other) => labels.iter().all(|l| other.contains(l)),
        }
    }

    /// Explicit labels; `Any` has none to list.
    pub fn labels(&self) -> &[String] {
        match self {
            TypeSet::Any => &[],
            TypeSet::Only(labels) => labels,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortDirection {
    Input,
    Output,
}

/// A typed connection point on a canvas node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub direction: PortDirection,
    pub types: TypeSet,
}

pub const OUTPUT_PORT_ID: &str = "output";
pub const INPUT_PORT_ID: &str = "input";

impl Port {
    pub fn output(types: TypeSet) -> Self {
        Self {
            id: OUTPUT_PORT_ID.to_string(),
            direction: PortDirection::Output,
            types,
        }
    }

    /// An input port accepting a single label, or anything when `label` is `None`.
    pub fn input(label: Option<&str>) -> Self {
        match label {
            Some(label) => Self {
                id: format!("{}-{}", INPUT_PORT_ID, label),
                direction: PortDirection::Input,
                types: TypeSet::only([label]),
            },
            None => Self {
                id: INPUT_PORT_ID.to_string(),
                direction: PortDirection::Input,
                types: TypeSet::Any,
            },
        }
    }
}
