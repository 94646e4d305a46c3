//! Rule reversal - deriving the rule that undoes another.
//!
//! Reversal is a pure transformation over a rule's three fact partitions:
//! - **kept** facts stay on both sides
//! - **added** facts become requirements that the reverse removes
//! - **removed** facts become effects that the reverse restores
//!
//! Some rules cannot be undone. Those listed as irreversible (consumption such as
//! eating) and those whose removed facts mention objects the reverse could never
//! bind yield [`Reversal::Irreversible`]. Placeholders named after a known constant
//! (the player, the inventory) are always bindable.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::{Mapping, Rule};

/// Outcome of reversing a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reversal {
    Reversible(Rule),
    Irreversible,
}

impl Reversal {
    pub fn is_reversible(&self) -> bool {
        matches!(self, Reversal::Reversible(_))
    }

    /// The reverse rule, if any.
    pub fn into_rule(self) -> Option<Rule> {
        match self {
            Reversal::Reversible(rule) => Some(rule),
            Reversal::Irreversible => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Reversal::Reversible(rule) => Some(rule),
            Reversal::Irreversible => None,
        }
    }
}

/// Side table driving reversal: names of reverse rules and the irreversible set.
#[derive(Debug, Clone, Default)]
pub struct ReversalTable {
    /// Rule name -> name given to its reverse, e.g. `take -> drop`.
    pub names: BTreeMap<String, String>,

    /// Rules that can never be undone.
    pub irreversible: BTreeSet<String>,
}

impl ReversalTable {
    /// Create an empty table: every rule is reversible and reverses are named `<name>/reverse`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the reverse of a rule.
    pub fn with_name(mut self, rule: impl Into<String>, reverse: impl Into<String>) -> Self {
        self.names.insert(rule.into(), reverse.into());
        self
    }

    /// Mark a rule as irreversible.
    pub fn with_irreversible(mut self, rule: impl Into<String>) -> Self {
        self.irreversible.insert(rule.into());
        self
    }

    /// Name of the reverse of `rule`.
    pub fn reverse_name(&self, rule: &str) -> String {
        self.names
            .get(rule)
            .cloned()
            .unwrap_or_else(|| format!("{}/reverse", rule))
    }

    /// Reverse a rule; `constants` are the bindings the reverse will be searched with.
    pub fn reverse(&self, rule: &Rule, constants: &Mapping) -> Reversal {
        if self.irreversible.contains(&rule.name) {
            debug!(rule = %rule.name, "rule is marked irreversible");
            return Reversal::Irreversible;
        }

        let inverse = rule.inverse(self.reverse_name(&rule.name));

        // Objects only mentioned by removed facts cannot be recovered.
        let bound: BTreeSet<_> = inverse
            .preconditions
            .iter()
            .flat_map(|p| p.placeholders())
            .chain(constants.keys())
            .collect();
        if let Some(lost) = inverse
            .postconditions
            .iter()
            .flat_map(|p| p.placeholders())
            .find(|p| !bound.contains(p))
        {
            debug!(rule = %rule.name, placeholder = %lost, "reverse would need an unbound object");
            return Reversal::Irreversible;
        }

        Reversal::Reversible(inverse)
    }
}
