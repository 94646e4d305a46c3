//! On-disk shape of a rules document.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use world_logic::{Placeholder, Proposition, Rule};

/// A complete rules document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesDocument {
    /// Rules that can never be undone.
    #[serde(default)]
    pub irreversible: BTreeSet<String>,

    /// Type -> direct parent types.
    #[serde(default)]
    pub types: BTreeMap<String, Vec<String>>,

    /// Type -> names of its constants.
    #[serde(default)]
    pub constants: BTreeMap<String, Vec<String>>,

    /// Rule -> name of its reverse.
    #[serde(default)]
    pub reverse: BTreeMap<String, String>,

    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// One rule, split into its three fact partitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    #[serde(default)]
    pub kept: Vec<PropositionEntry>,
    #[serde(default)]
    pub removed: Vec<PropositionEntry>,
    #[serde(default)]
    pub added: Vec<PropositionEntry>,
}

/// A proposition over placeholder names, e.g. `{ name = "at", arguments = ["P", "r"] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropositionEntry {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl PropositionEntry {
    pub fn to_proposition(&self) -> Proposition {
        Proposition::new(&self.name, self.arguments.iter().map(Placeholder::new))
    }
}

impl RuleEntry {
    /// Build the rule: preconditions are kept + removed, postconditions kept + added.
    pub fn to_rule(&self) -> Rule {
        let convert = |entries: &[PropositionEntry]| -> Vec<Proposition> {
            entries.iter().map(PropositionEntry::to_proposition).collect()
        };
        let kept = convert(&self.kept);

        let mut preconditions = kept.clone();
        preconditions.extend(convert(&self.removed));
        let mut postconditions = kept;
        postconditions.extend(convert(&self.added));

        Rule::new(self.name.clone(), preconditions, postconditions)
    }
}
