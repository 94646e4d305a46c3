//! Atomic facts.

use serde::{Deserialize, Serialize};

use crate::{Mapping, Placeholder, Record, Term, Variable};

/// A predicate applied to an ordered list of terms, e.g. `link(bedroom, door, kitchen)`.
///
/// Equality is structural and order-sensitive. Construction performs no type
/// checking; that happens when a rule is instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Proposition {
    pub name: String,
    pub arguments: Vec<Term>,
}

impl Proposition {
    /// Create a new proposition.
    pub fn new(name: impl Into<String>, arguments: impl IntoIterator<Item = impl Into<Term>>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Check if every argument is a bound object.
    pub fn is_ground(&self) -> bool {
        self.arguments.iter().all(Term::is_ground)
    }

    /// Placeholders among the arguments, in position order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.arguments.iter().filter_map(Term::as_placeholder)
    }

    /// Variables among the arguments, in position order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.arguments.iter().filter_map(Term::as_variable)
    }

    /// Replace every mapped placeholder by its object; unmapped ones are left as is.
    pub fn substitute(&self, mapping: &Mapping) -> Proposition {
        let arguments = self
            .arguments
            .iter()
            .map(|arg| match arg {
                Term::Placeholder(p) => mapping
                    .get(p)
                    .map(|v| Term::Variable(v.clone()))
                    .unwrap_or_else(|| arg.clone()),
                Term::Variable(_) => arg.clone(),
            })
            .collect();

        Proposition {
            name: self.name.clone(),
            arguments,
        }
    }
}

impl Record for Proposition {}

impl std::fmt::Display for Proposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args = self
            .arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.name, args)
    }
}
