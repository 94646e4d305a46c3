//! Parametrized rule templates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{added, fmt_template, kept, removed, same_facts};
use crate::{
    Action, LogicError, Mapping, Placeholder, Proposition, Record, Result, TypeHierarchy, Variable,
};

/// A named precondition -> postcondition template over placeholders.
///
/// Equality compares the name and the two fact sets, ignoring order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub preconditions: Vec<Proposition>,
    pub postconditions: Vec<Proposition>,
}

impl Rule {
    /// Create a new rule.
    pub fn new(
        name: impl Into<String>,
        preconditions: Vec<Proposition>,
        postconditions: Vec<Proposition>,
    ) -> Self {
        Self {
            name: name.into(),
            preconditions,
            postconditions,
        }
    }

    /// Distinct placeholders in order of first appearance, preconditions first.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut seen = BTreeSet::new();
        self.preconditions
            .iter()
            .chain(&self.postconditions)
            .flat_map(Proposition::placeholders)
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Facts the rule requires and leaves in place.
    pub fn kept(&self) -> impl Iterator<Item = &Proposition> {
        kept(&self.preconditions, &self.postconditions)
    }

    /// Facts the rule creates.
    pub fn added(&self) -> impl Iterator<Item = &Proposition> {
        added(&self.preconditions, &self.postconditions)
    }

    /// Facts the rule deletes.
    pub fn removed(&self) -> impl Iterator<Item = &Proposition> {
        removed(&self.preconditions, &self.postconditions)
    }

    /// Check the rule against a type hierarchy.
    ///
    /// Every type must be declared and every postcondition placeholder must be
    /// bound by some precondition or named after a registered constant.
    pub fn validate(&self, types: &TypeHierarchy) -> Result<()> {
        for prop in self.preconditions.iter().chain(&self.postconditions) {
            for arg in &prop.arguments {
                types.require(arg.type_name())?;
            }
        }

        let constants = types.constants_mapping();
        let bound: BTreeSet<_> = self
            .preconditions
            .iter()
            .flat_map(Proposition::placeholders)
            .chain(constants.keys())
            .collect();

        if let Some(free) = self
            .postconditions
            .iter()
            .flat_map(Proposition::placeholders)
            .find(|p| !bound.contains(p))
        {
            return Err(LogicError::FreePlaceholder {
                rule: self.name.clone(),
                placeholder: free.name.clone(),
            });
        }

        Ok(())
    }

    /// Ground the rule with a total, well-typed mapping.
    ///
    /// Fails with [`LogicError::IncompleteBinding`] when a placeholder is unmapped and
    /// with [`LogicError::IllTypedBinding`] when an object's type is not a subtype of
    /// the placeholder's type. Extra entries in the mapping are ignored.
    pub fn instantiate(&self, types: &TypeHierarchy, mapping: &Mapping) -> Result<Action> {
        for placeholder in self.placeholders() {
            let variable = mapping
                .get(placeholder)
                .ok_or_else(|| LogicError::IncompleteBinding {
                    rule: self.name.clone(),
                    placeholder: placeholder.name.clone(),
                })?;

            if !types.is_subtype(&variable.type_name, &placeholder.type_name) {
                return Err(LogicError::IllTypedBinding {
                    placeholder: placeholder.name.clone(),
                    variable: variable.name.clone(),
                    expected: placeholder.type_name.clone(),
                    found: variable.type_name.clone(),
                });
            }
        }

        let ground = |props: &[Proposition]| -> Vec<Proposition> {
            props.iter().map(|p| p.substitute(mapping)).collect()
        };

        Action::new(
            self.name.clone(),
            ground(&self.preconditions),
            ground(&self.postconditions),
        )
    }

    /// Ground the rule, inventing an object for each placeholder the constants don't cover.
    ///
    /// The invented object takes the placeholder's name and type, so `r'` becomes the
    /// room `r'`. Applied to a rule, this yields the smallest state the rule fires in.
    pub fn instantiate_with_fresh(
        &self,
        types: &TypeHierarchy,
        constants: &Mapping,
    ) -> Result<Action> {
        let mut mapping = Mapping::new();
        for placeholder in self.placeholders() {
            let variable = constants.get(placeholder).cloned().unwrap_or_else(|| {
                Variable::new(placeholder.name.clone(), placeholder.type_name.clone())
            });
            mapping.insert(placeholder.clone(), variable);
        }
        self.instantiate(types, &mapping)
    }

    /// The structural inverse: added facts become requirements, removed facts get restored.
    ///
    /// This does not decide whether undoing makes sense; see [`crate::ReversalTable`].
    pub fn inverse(&self, name: impl Into<String>) -> Rule {
        let kept: Vec<_> = self.kept().cloned().collect();
        Rule {
            name: name.into(),
            preconditions: kept.iter().cloned().chain(self.added().cloned()).collect(),
            postconditions: kept.into_iter().chain(self.removed().cloned()).collect(),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && same_facts(&self.preconditions, &other.preconditions)
            && same_facts(&self.postconditions, &other.postconditions)
    }
}

impl Eq for Rule {}

impl Record for Rule {}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_template(f, &self.name, &self.preconditions, &self.postconditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph(name: &str) -> Placeholder {
        Placeholder::new(name)
    }

    fn types() -> TypeHierarchy {
        let mut types = TypeHierarchy::new();
        for root in ["P", "I", "r", "t"] {
            types.add_type(root, Vec::<String>::new()).unwrap();
        }
        types.add_type("o", ["t"]).unwrap();
        types.add_type("k", ["o"]).unwrap();
        types.add_constant(Variable::new("P", "P")).unwrap();
        types.add_constant(Variable::new("I", "I")).unwrap();
        types
    }

    /// take :: at(P, r) & at(o, r) -> at(P, r) & in(o, I)
    fn take() -> Rule {
        Rule::new(
            "take",
            vec![
                Proposition::new("at", [ph("P"), ph("r")]),
                Proposition::new("at", [ph("o"), ph("r")]),
            ],
            vec![
                Proposition::new("at", [ph("P"), ph("r")]),
                Proposition::new("in", [ph("o"), ph("I")]),
            ],
        )
    }

    fn mapping() -> Mapping {
        let mut mapping = types().constants_mapping();
        mapping.insert(ph("r"), Variable::new("bedroom", "r"));
        mapping.insert(ph("o"), Variable::new("old key", "k"));
        mapping
    }

    #[test]
    fn test_placeholders_in_first_appearance_order() {
        let rule = take();
        let names: Vec<_> = rule.placeholders().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P", "r", "o", "I"]);
    }

    #[test]
    fn test_partitions() {
        let rule = take();
        assert_eq!(rule.kept().count(), 1);
        assert_eq!(rule.added().next().unwrap().name, "in");
        assert_eq!(rule.removed().next().unwrap().to_string(), "at(o, r)");
    }

    #[test]
    fn test_instantiate_accepts_subtypes() {
        let action = take().instantiate(&types(), &mapping()).unwrap();
        assert_eq!(action.name(), "take");
        assert!(action.preconditions().iter().all(Proposition::is_ground));
        assert_eq!(action.added().next().unwrap().to_string(), "in(old key, I)");
    }

    #[test]
    fn test_instantiate_incomplete_binding() {
        let mut mapping = mapping();
        mapping.remove(&ph("o"));
        let err = take().instantiate(&types(), &mapping).unwrap_err();
        assert!(matches!(err, LogicError::IncompleteBinding { placeholder, .. } if placeholder == "o"));
    }

    #[test]
    fn test_instantiate_ill_typed_binding() {
        let mut mapping = mapping();
        mapping.insert(ph("o"), Variable::new("kitchen", "r"));
        let err = take().instantiate(&types(), &mapping).unwrap_err();
        assert!(matches!(
            err,
            LogicError::IllTypedBinding { expected, found, .. } if expected == "o" && found == "r"
        ));
    }

    #[test]
    fn test_instantiate_with_fresh() {
        let action = take()
            .instantiate_with_fresh(&types(), &types().constants_mapping())
            .unwrap();
        assert_eq!(action.preconditions()[1].to_string(), "at(o, r)");
        assert_eq!(action.postconditions()[1].to_string(), "in(o, I)");
    }

    #[test]
    fn test_validate_rejects_free_placeholder() {
        let rule = Rule::new(
            "conjure",
            vec![Proposition::new("at", [ph("P"), ph("r")])],
            vec![
                Proposition::new("at", [ph("P"), ph("r")]),
                Proposition::new("at", [ph("o"), ph("r")]),
            ],
        );
        assert!(matches!(
            rule.validate(&types()),
            Err(LogicError::FreePlaceholder { placeholder, .. }) if placeholder == "o"
        ));
        assert!(take().validate(&types()).is_ok());
    }

    #[test]
    fn test_validate_accepts_constant_only_in_effects() {
        // `I` is never matched by a precondition of take; the inventory constant binds it.
        assert!(take().validate(&types()).is_ok());

        let mut no_constants = TypeHierarchy::new();
        for root in ["P", "I", "r", "t"] {
            no_constants.add_type(root, Vec::<String>::new()).unwrap();
        }
        no_constants.add_type("o", ["t"]).unwrap();
        assert!(matches!(
            take().validate(&no_constants),
            Err(LogicError::FreePlaceholder { placeholder, .. }) if placeholder == "I"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let rule = Rule::new("fly", vec![Proposition::new("wings", [ph("b")])], vec![]);
        assert!(matches!(rule.validate(&types()), Err(LogicError::UnknownType(t)) if t == "b"));
    }

    #[test]
    fn test_inverse_swaps_added_and_removed() {
        let drop = take().inverse("drop");
        assert_eq!(drop.name, "drop");
        assert_eq!(drop.added().next().unwrap().to_string(), "at(o, r)");
        assert_eq!(drop.removed().next().unwrap().to_string(), "in(o, I)");
        assert_eq!(drop.inverse("take"), take());
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut shuffled = take();
        shuffled.preconditions.reverse();
        assert_eq!(shuffled, take());
    }

    #[test]
    fn test_record_round_trip() {
        let rule = take();
        let record = rule.to_record().unwrap();
        assert_eq!(record["preconditions"][0]["arguments"][0]["term"], "placeholder");
        assert_eq!(Rule::from_record(record).unwrap(), rule);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            take().to_string(),
            "take :: at(P, r) & at(o, r) -> at(P, r) & in(o, I)"
        );
    }
}
