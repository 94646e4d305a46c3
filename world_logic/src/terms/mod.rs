//! Logic terms: bound variables and unbound placeholders.

mod placeholder;
mod variable;

pub use placeholder::*;
pub use variable::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A binding from rule placeholders to concrete objects.
pub type Mapping = BTreeMap<Placeholder, Variable>;

/// An argument of a proposition.
///
/// Serialized with a `term` discriminator so placeholder and variable records
/// can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "term", rename_all = "lowercase")]
pub enum Term {
    Variable(Variable),
    Placeholder(Placeholder),
}

impl Term {
    /// The term's declared type.
    pub fn type_name(&self) -> &str {
        match self {
            Term::Variable(v) => &v.type_name,
            Term::Placeholder(p) => &p.type_name,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Term::Variable(v) => &v.name,
            Term::Placeholder(p) => &p.name,
        }
    }

    /// Check if this term is a bound object.
    pub fn is_ground(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            Term::Placeholder(_) => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            Term::Placeholder(p) => Some(p),
            Term::Variable(_) => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term::Variable(variable)
    }
}

impl From<Placeholder> for Term {
    fn from(placeholder: Placeholder) -> Self {
        Term::Placeholder(placeholder)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
