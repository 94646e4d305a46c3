//! Concrete, typed objects.

use serde::{Deserialize, Serialize};

use crate::Record;

/// A bound object with a name and a type, e.g. `bedroom: r`.
///
/// Two variables are equal iff both name and type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Variable {
    /// Create a new variable.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl Record for Variable {}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
