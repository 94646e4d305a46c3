//! Rules registry - the loaded, validated rule set and its reverse rules.

mod document;

pub use document::*;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};
use world_logic::{Mapping, ReversalTable, Rule, TypeHierarchy, Variable};

use crate::{GrammarError, Result};

/// The basic rule set shipped with the crate.
pub const SHIPPED_RULES: &str = include_str!("../../rules/basic.toml");

/// Marker separating the parts of a composite rule name, e.g. `open/d-go/east`.
pub const COMPOSITE_MARKER: char = '-';

/// An immutable, validated rule set.
///
/// Reverse rules are derived from the whole set on first request and cached.
#[derive(Debug)]
pub struct RuleRegistry {
    types: TypeHierarchy,
    constants: Mapping,
    rules: BTreeMap<String, Rule>,
    reversals: ReversalTable,
    reverse_rules: OnceLock<BTreeMap<String, Option<Rule>>>,
}

impl RuleRegistry {
    /// Load the shipped basic rules.
    pub fn shipped() -> Result<Self> {
        Self::from_toml_str(SHIPPED_RULES)
    }

    /// Load a rules document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load a rules document from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let document: RulesDocument = toml::from_str(text)?;
        Self::from_document(&document)
    }

    /// Build and validate a registry from a parsed document.
    pub fn from_document(document: &RulesDocument) -> Result<Self> {
        let types = build_types(document)?;

        let mut rules = BTreeMap::new();
        for entry in &document.rules {
            let rule = entry.to_rule();
            rule.validate(&types)?;
            if rules.insert(rule.name.clone(), rule).is_some() {
                return Err(GrammarError::DuplicateRule(entry.name.clone()));
            }
        }

        for name in document.reverse.keys() {
            if !rules.contains_key(name) {
                return Err(GrammarError::UnknownRule {
                    section: "reverse",
                    rule: name.clone(),
                });
            }
        }
        for name in &document.irreversible {
            if !rules.contains_key(name) {
                return Err(GrammarError::UnknownRule {
                    section: "irreversible",
                    rule: name.clone(),
                });
            }
        }

        let reversals = ReversalTable {
            names: document.reverse.clone(),
            irreversible: document.irreversible.clone(),
        };

        info!(
            rules = rules.len(),
            types = document.types.len(),
            "loaded rules registry"
        );

        Ok(Self {
            constants: types.constants_mapping(),
            types,
            rules,
            reversals,
            reverse_rules: OnceLock::new(),
        })
    }

    /// The type hierarchy, including the constants.
    pub fn types(&self) -> &TypeHierarchy {
        &self.types
    }

    /// Bindings for placeholders named after known constants (the player, the inventory).
    pub fn constants_mapping(&self) -> &Mapping {
        &self.constants
    }

    /// All rules by name.
    pub fn rules(&self) -> &BTreeMap<String, Rule> {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Rules whose names carry no composite marker.
    pub fn basic_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .values()
            .filter(|r| !r.name.contains(COMPOSITE_MARKER))
    }

    pub fn reversal_table(&self) -> &ReversalTable {
        &self.reversals
    }

    /// The reverse of a registered rule, or `None` for irreversible rules.
    ///
    /// Rules not registered under their name also yield `None`; reverse those
    /// through [`Self::reversal_table`].
    pub fn reverse_rule(&self, rule: &Rule) -> Option<&Rule> {
        if self.rules.get(&rule.name) != Some(rule) {
            debug!(rule = %rule.name, "reverse requested for an unregistered rule");
            return None;
        }
        self.reverse_rules()
            .get(&rule.name)
            .and_then(Option::as_ref)
    }

    fn reverse_rules(&self) -> &BTreeMap<String, Option<Rule>> {
        self.reverse_rules.get_or_init(|| {
            let reversed: BTreeMap<_, _> = self
                .rules
                .values()
                .map(|rule| {
                    let reverse = self.reversals.reverse(rule, &self.constants);
                    (rule.name.clone(), reverse.into_rule())
                })
                .collect();
            debug!(
                reversible = reversed.values().filter(|r| r.is_some()).count(),
                "derived reverse rules"
            );
            reversed
        })
    }
}

/// Declare types parents-first, then the constants.
fn build_types(document: &RulesDocument) -> Result<TypeHierarchy> {
    let mut types = TypeHierarchy::new();
    let mut pending: Vec<_> = document.types.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for (name, parents) in pending {
            if parents.iter().all(|p| types.contains(p)) {
                types.add_type(name.clone(), parents.iter().cloned())?;
            } else {
                deferred.push((name, parents));
            }
        }
        if deferred.len() == before {
            let (name, _) = deferred[0];
            return Err(GrammarError::UnresolvedType(name.clone()));
        }
        pending = deferred;
    }

    for (type_name, names) in &document.constants {
        for name in names {
            types.add_constant(Variable::new(name.clone(), type_name.clone()))?;
        }
    }

    Ok(types)
}
