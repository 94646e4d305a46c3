//! Grounded actions.

use serde::{Deserialize, Serialize};

use super::{added, fmt_template, kept, removed, same_facts};
use crate::{LogicError, Proposition, Record, Result};

/// A rule with every placeholder replaced by a concrete object.
///
/// Actions only ever hold ground propositions; this is checked on construction and
/// on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ActionRecord")]
pub struct Action {
    name: String,
    preconditions: Vec<Proposition>,
    postconditions: Vec<Proposition>,
}

/// Unchecked wire form of an [`Action`].
#[derive(Deserialize)]
struct ActionRecord {
    name: String,
    preconditions: Vec<Proposition>,
    postconditions: Vec<Proposition>,
}

impl TryFrom<ActionRecord> for Action {
    type Error = LogicError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        Action::new(record.name, record.preconditions, record.postconditions)
    }
}

impl Action {
    /// Create a new action from ground propositions.
    pub fn new(
        name: impl Into<String>,
        preconditions: Vec<Proposition>,
        postconditions: Vec<Proposition>,
    ) -> Result<Self> {
        if let Some(open) = preconditions
            .iter()
            .chain(&postconditions)
            .find(|p| !p.is_ground())
        {
            return Err(LogicError::NotGround(open.to_string()));
        }

        Ok(Self {
            name: name.into(),
            preconditions,
            postconditions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[Proposition] {
        &self.preconditions
    }

    pub fn postconditions(&self) -> &[Proposition] {
        &self.postconditions
    }

    /// Facts the action requires and leaves in place.
    pub fn kept(&self) -> impl Iterator<Item = &Proposition> {
        kept(&self.preconditions, &self.postconditions)
    }

    /// Facts the action creates.
    pub fn added(&self) -> impl Iterator<Item = &Proposition> {
        added(&self.preconditions, &self.postconditions)
    }

    /// Facts the action deletes.
    pub fn removed(&self) -> impl Iterator<Item = &Proposition> {
        removed(&self.preconditions, &self.postconditions)
    }

    /// The action undoing this one, with the same kept facts.
    pub fn inverse(&self, name: impl Into<String>) -> Action {
        let kept: Vec<_> = self.kept().cloned().collect();
        Action {
            name: name.into(),
            preconditions: kept.iter().cloned().chain(self.added().cloned()).collect(),
            postconditions: kept.into_iter().chain(self.removed().cloned()).collect(),
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && same_facts(&self.preconditions, &other.preconditions)
            && same_facts(&self.postconditions, &other.postconditions)
    }
}

impl Eq for Action {}

impl Record for Action {}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_template(f, &self.name, &self.preconditions, &self.postconditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Placeholder, Variable};

    fn open_chest() -> Action {
        let chest = Variable::new("chest", "c");
        let kitchen = Variable::new("kitchen", "r");
        let player = Variable::new("P", "P");
        Action::new(
            "open/c",
            vec![
                Proposition::new("at", [player.clone(), kitchen.clone()]),
                Proposition::new("at", [chest.clone(), kitchen.clone()]),
                Proposition::new("closed", [chest.clone()]),
            ],
            vec![
                Proposition::new("at", [player, kitchen.clone()]),
                Proposition::new("at", [chest.clone(), kitchen]),
                Proposition::new("open", [chest]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_placeholders() {
        let err = Action::new(
            "open/c",
            vec![Proposition::new("closed", [Placeholder::new("c")])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, LogicError::NotGround(p) if p == "closed(c)"));
    }

    #[test]
    fn test_partitions() {
        let action = open_chest();
        assert_eq!(action.kept().count(), 2);
        assert_eq!(action.added().next().unwrap().to_string(), "open(chest)");
        assert_eq!(action.removed().next().unwrap().to_string(), "closed(chest)");
    }

    #[test]
    fn test_inverse() {
        let close = open_chest().inverse("close/c");
        assert_eq!(close.added().next().unwrap().to_string(), "closed(chest)");
        assert_eq!(close.inverse("open/c"), open_chest());
    }

    #[test]
    fn test_record_round_trip() {
        let action = open_chest();
        let json = action.to_json().unwrap();
        assert_eq!(Action::from_json(&json).unwrap(), action);
    }

    #[test]
    fn test_deserializing_placeholder_fails() {
        let record = serde_json::json!({
            "name": "open/c",
            "preconditions": [
                {"name": "closed", "arguments": [{"term": "placeholder", "name": "c", "type": "c"}]}
            ],
            "postconditions": []
        });
        assert!(Action::from_record(record).is_err());
    }
}
