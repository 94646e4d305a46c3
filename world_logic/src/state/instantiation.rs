//! Instantiation engine - finds every grounding of a rule in a state.
//!
//! The search is a depth-first walk over the rule's preconditions in declaration
//! order, carrying a partial binding:
//! 1. **Seed**: Constants bind the placeholders named after them
//! 2. **Match**: The next precondition is unified with each fact of the state, in order
//! 3. **Descend**: Each consistent match extends the binding one level deeper
//! 4. **Yield**: A binding that satisfies every precondition grounds one action
//!
//! An explicit stack replaces recursion, which makes the search a lazy iterator.

use tracing::{trace, warn};

use super::State;
use crate::{Action, Mapping, Proposition, Rule, Term, TypeHierarchy};

/// Lazy, restartable enumeration of a rule's actions in a state.
///
/// Bindings are injective: two placeholders of one rule never name the same object.
#[derive(Debug, Clone)]
pub struct Instantiations<'a> {
    state: &'a State,
    rule: &'a Rule,
    types: &'a TypeHierarchy,
    stack: Vec<Frame>,
}

/// One level of the search: the precondition being matched and where to resume.
#[derive(Debug, Clone)]
struct Frame {
    depth: usize,
    cursor: usize,
    binding: Mapping,
}

impl<'a> Instantiations<'a> {
    pub(crate) fn new(
        state: &'a State,
        rule: &'a Rule,
        types: &'a TypeHierarchy,
        constants: &Mapping,
    ) -> Self {
        let mut seed = Mapping::new();
        let mut consistent = true;

        for placeholder in rule.placeholders() {
            let Some(constant) = constants.get(placeholder) else {
                continue;
            };
            if !types.is_subtype(&constant.type_name, &placeholder.type_name)
                || seed.values().any(|v| v == constant)
            {
                consistent = false;
                break;
            }
            seed.insert(placeholder.clone(), constant.clone());
        }

        trace!(rule = %rule.name, seeded = seed.len(), consistent, "starting instantiation search");

        let stack = if consistent {
            vec![Frame {
                depth: 0,
                cursor: 0,
                binding: seed,
            }]
        } else {
            Vec::new()
        };

        Self {
            state,
            rule,
            types,
            stack,
        }
    }
}

impl Iterator for Instantiations<'_> {
    type Item = Action;

    fn next(&mut self) -> Option<Action> {
        let preconditions = &self.rule.preconditions;

        while let Some(frame) = self.stack.last_mut() {
            if frame.depth == preconditions.len() {
                let binding = std::mem::take(&mut frame.binding);
                self.stack.pop();
                match self.rule.instantiate(self.types, &binding) {
                    Ok(action) => return Some(action),
                    Err(err) => {
                        warn!(rule = %self.rule.name, error = %err, "complete binding failed to ground");
                        continue;
                    }
                }
            }

            let pattern = &preconditions[frame.depth];
            let found = self
                .state
                .facts()
                .enumerate()
                .skip(frame.cursor)
                .find_map(|(index, fact)| {
                    unify(pattern, fact, &frame.binding, self.types).map(|b| (index, b))
                });

            match found {
                Some((index, binding)) => {
                    frame.cursor = index + 1;
                    let depth = frame.depth + 1;
                    self.stack.push(Frame {
                        depth,
                        cursor: 0,
                        binding,
                    });
                }
                None => {
                    self.stack.pop();
                }
            }
        }

        None
    }
}

/// Match a rule pattern against a ground fact under a partial binding.
///
/// Returns the extended binding, or `None` if the fact cannot satisfy the pattern.
fn unify(
    pattern: &Proposition,
    fact: &Proposition,
    binding: &Mapping,
    types: &TypeHierarchy,
) -> Option<Mapping> {
    if pattern.name != fact.name || pattern.arity() != fact.arity() {
        return None;
    }

    let mut binding = binding.clone();
    for (slot, arg) in pattern.arguments.iter().zip(&fact.arguments) {
        let object = arg.as_variable()?;
        match slot {
            Term::Variable(expected) => {
                if expected != object {
                    return None;
                }
            }
            Term::Placeholder(placeholder) => match binding.get(placeholder) {
                Some(bound) if bound == object => {}
                Some(_) => return None,
                None => {
                    if !types.is_subtype(&object.type_name, &placeholder.type_name)
                        || binding.values().any(|v| v == object)
                    {
                        return None;
                    }
                    binding.insert(placeholder.clone(), object.clone());
                }
            },
        }
    }

    Some(binding)
}
