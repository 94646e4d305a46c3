//! World states: sets of ground facts and their transitions.
//!
//! A state is mutated only through [`State::apply`], which follows closed-world
//! STRIPS semantics:
//! 1. **Check**: every precondition must already be a fact, otherwise nothing changes
//! 2. **Delete**: facts in the preconditions but not the postconditions are removed
//! 3. **Add**: facts in the postconditions but not the state are inserted
//!
//! Facts mentioned on neither side are untouched.

mod instantiation;

pub use instantiation::*;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Action, LogicError, Mapping, Proposition, Result, Rule, TypeHierarchy, Variable};

/// A set of ground facts.
///
/// Iteration follows insertion order so enumeration over a state is reproducible;
/// equality ignores order. `clone()` yields an independent snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Proposition>", into = "Vec<Proposition>")]
pub struct State {
    facts: IndexSet<Proposition>,
}

impl State {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from a sequence of ground facts; repeats collapse.
    pub fn from_facts(facts: impl IntoIterator<Item = Proposition>) -> Result<Self> {
        let mut state = Self::new();
        for fact in facts {
            state.add_fact(fact)?;
        }
        Ok(state)
    }

    /// Insert a fact. Returns `false` if it was already present.
    pub fn add_fact(&mut self, fact: Proposition) -> Result<bool> {
        if !fact.is_ground() {
            return Err(LogicError::NotGround(fact.to_string()));
        }
        Ok(self.facts.insert(fact))
    }

    /// Remove a fact, keeping the order of the others.
    pub fn remove_fact(&mut self, fact: &Proposition) -> bool {
        self.facts.shift_remove(fact)
    }

    pub fn is_fact(&self, fact: &Proposition) -> bool {
        self.facts.contains(fact)
    }

    /// Check that every given proposition holds.
    pub fn are_facts<'a>(&self, facts: impl IntoIterator<Item = &'a Proposition>) -> bool {
        facts.into_iter().all(|f| self.is_fact(f))
    }

    /// All facts in insertion order.
    pub fn facts(&self) -> impl Iterator<Item = &Proposition> {
        self.facts.iter()
    }

    /// Facts with a given predicate name.
    pub fn facts_with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Proposition> + 'a {
        self.facts.iter().filter(move |f| f.name == name)
    }

    /// Distinct objects mentioned by the facts, in first-appearance order.
    pub fn objects(&self) -> Vec<&Variable> {
        let mut objects = IndexSet::new();
        for fact in &self.facts {
            objects.extend(fact.variables());
        }
        objects.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Check if every precondition of the action holds.
    pub fn is_applicable(&self, action: &Action) -> bool {
        self.are_facts(action.preconditions())
    }

    /// Apply an action in place.
    ///
    /// Fails with [`LogicError::InapplicableAction`] and leaves the state untouched
    /// when a precondition does not hold.
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        if let Some(missing) = action.preconditions().iter().find(|p| !self.is_fact(p)) {
            return Err(LogicError::InapplicableAction {
                action: action.name().to_string(),
                missing: missing.to_string(),
            });
        }

        for fact in action.removed() {
            self.facts.shift_remove(fact);
        }
        for fact in action.added() {
            self.facts.insert(fact.clone());
        }

        debug!(action = action.name(), facts = self.facts.len(), "applied action");
        Ok(())
    }

    /// Every way the rule can fire in this state, in a reproducible order.
    ///
    /// `constants` pre-binds placeholders named after known objects (the player,
    /// the inventory). The returned iterator is lazy; calling this again restarts
    /// the enumeration from scratch.
    pub fn all_instantiations<'a>(
        &'a self,
        rule: &'a Rule,
        types: &'a TypeHierarchy,
        constants: &Mapping,
    ) -> Instantiations<'a> {
        Instantiations::new(self, rule, types, constants)
    }

    /// Instantiations of every rule, concatenated in rule order.
    pub fn all_applicable_actions<'a, I>(
        &'a self,
        rules: I,
        types: &'a TypeHierarchy,
        constants: &'a Mapping,
    ) -> impl Iterator<Item = Action> + 'a
    where
        I: IntoIterator<Item = &'a Rule>,
        I::IntoIter: 'a,
    {
        rules
            .into_iter()
            .flat_map(move |rule| self.all_instantiations(rule, types, constants))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.facts.len() == other.facts.len() && self.facts.iter().all(|f| other.facts.contains(f))
    }
}

impl Eq for State {}

impl TryFrom<Vec<Proposition>> for State {
    type Error = LogicError;

    fn try_from(facts: Vec<Proposition>) -> Result<Self> {
        State::from_facts(facts)
    }
}

impl From<State> for Vec<Proposition> {
    fn from(state: State) -> Self {
        state.facts.into_iter().collect()
    }
}

impl crate::Record for State {}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let facts = self
            .facts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{}}}", facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Placeholder, Record};

    fn var(name: &str, type_name: &str) -> Variable {
        Variable::new(name, type_name)
    }

    fn fact(name: &str, args: &[&Variable]) -> Proposition {
        Proposition::new(name, args.iter().map(|v| (*v).clone()))
    }

    fn door_state() -> State {
        let door = var("wooden door", "d");
        let bedroom = var("bedroom", "r");
        let kitchen = var("kitchen", "r");
        State::from_facts([
            fact("at", &[&var("P", "P"), &bedroom]),
            fact("link", &[&bedroom, &door, &kitchen]),
            fact("closed", &[&door]),
        ])
        .unwrap()
    }

    fn open_door() -> Action {
        let door = var("wooden door", "d");
        let bedroom = var("bedroom", "r");
        let kitchen = var("kitchen", "r");
        Action::new(
            "open/d",
            vec![
                fact("at", &[&var("P", "P"), &bedroom]),
                fact("link", &[&bedroom, &door, &kitchen]),
                fact("closed", &[&door]),
            ],
            vec![
                fact("at", &[&var("P", "P"), &bedroom]),
                fact("link", &[&bedroom, &door, &kitchen]),
                fact("open", &[&door]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_set_semantics() {
        let door = var("wooden door", "d");
        let state = State::from_facts([fact("open", &[&door]), fact("open", &[&door])]).unwrap();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_rejects_placeholders() {
        let mut state = State::new();
        let err = state
            .add_fact(Proposition::new("open", [Placeholder::new("d")]))
            .unwrap_err();
        assert!(matches!(err, LogicError::NotGround(_)));
        assert!(state.is_empty());
    }

    #[test]
    fn test_apply() {
        let mut state = door_state();
        state.apply(&open_door()).unwrap();

        let door = var("wooden door", "d");
        assert!(state.is_fact(&fact("open", &[&door])));
        assert!(!state.is_fact(&fact("closed", &[&door])));
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_apply_leaves_unrelated_facts() {
        let robe = var("robe", "o");
        let mut state = door_state();
        state.add_fact(fact("on", &[&robe, &var("counter", "s")])).unwrap();

        state.apply(&open_door()).unwrap();
        assert_eq!(state.facts_with_name("on").count(), 1);
    }

    #[test]
    fn test_apply_inapplicable_is_atomic() {
        let mut state = door_state();
        state.apply(&open_door()).unwrap();
        let before = state.clone();

        let err = state.apply(&open_door()).unwrap_err();
        assert!(matches!(
            err,
            LogicError::InapplicableAction { missing, .. } if missing == "closed(wooden door)"
        ));
        assert_eq!(state, before);
        assert_eq!(state.facts().collect::<Vec<_>>(), before.facts().collect::<Vec<_>>());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = door_state();
        let mut copy = original.clone();
        copy.apply(&open_door()).unwrap();

        assert_ne!(copy, original);
        assert!(original.is_applicable(&open_door()));
        assert!(!copy.is_applicable(&open_door()));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut facts: Vec<_> = door_state().facts().cloned().collect();
        facts.reverse();
        assert_eq!(State::from_facts(facts).unwrap(), door_state());
    }

    #[test]
    fn test_objects_in_first_appearance_order() {
        let state = door_state();
        let names: Vec<_> = state.objects().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["P", "bedroom", "wooden door", "kitchen"]);
    }

    #[test]
    fn test_record_round_trip() {
        let state = door_state();
        let record = state.to_record().unwrap();
        assert!(record.is_array());
        assert_eq!(State::from_record(record).unwrap(), state);
    }
}
