//! Typed slots inside rule templates.

use serde::{Deserialize, Serialize};

use crate::Record;

/// An unbound slot of a rule, e.g. `r'`.
///
/// Placeholders never appear in a state. Trailing primes make distinct identities
/// of the same type: `r` and `r'` are two different rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placeholder {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Placeholder {
    /// Create a placeholder whose type is its name without trailing primes.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_name = name.trim_end_matches('\'').to_string();
        Self { name, type_name }
    }

    /// Create a placeholder with an explicit type.
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl Record for Placeholder {}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
