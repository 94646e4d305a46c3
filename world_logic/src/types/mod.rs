//! Type hierarchy and globally known constants.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{LogicError, Mapping, Placeholder, Result, Variable};

/// The hierarchy of object types plus the named constants of each type.
///
/// Types form a DAG: each type lists its direct parents. Subtyping is reflexive and
/// transitive. The hierarchy is read-only once built and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    /// Type -> direct parent types.
    parents: BTreeMap<String, Vec<String>>,

    /// Type -> constants of exactly that type, in declaration order.
    constants: BTreeMap<String, Vec<Variable>>,
}

impl TypeHierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type with its direct parents.
    ///
    /// Parents must already be declared.
    pub fn add_type(
        &mut self,
        name: impl Into<String>,
        parents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let parents: Vec<String> = parents.into_iter().map(Into::into).collect();
        if let Some(unknown) = parents.iter().find(|p| !self.contains(p)) {
            return Err(LogicError::UnknownType(unknown.clone()));
        }
        self.parents.insert(name.into(), parents);
        Ok(())
    }

    /// Register a named constant of a known type.
    pub fn add_constant(&mut self, constant: Variable) -> Result<()> {
        if !self.contains(&constant.type_name) {
            return Err(LogicError::UnknownType(constant.type_name));
        }
        let constants = self.constants.entry(constant.type_name.clone()).or_default();
        if !constants.contains(&constant) {
            constants.push(constant);
        }
        Ok(())
    }

    /// Check if a type is declared.
    pub fn contains(&self, type_name: &str) -> bool {
        self.parents.contains_key(type_name)
    }

    /// Check that a type is declared.
    pub fn require(&self, type_name: &str) -> Result<()> {
        if self.contains(type_name) {
            Ok(())
        } else {
            Err(LogicError::UnknownType(type_name.to_string()))
        }
    }

    /// All declared type names.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    /// Check if `sub` equals or descends from `sup`.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        self.ancestors(sub).any(|ancestor| ancestor == sup)
    }

    /// Strict ancestors of a type, nearest first, each listed once.
    pub fn ancestors<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<&str> = self
            .parents
            .get(type_name)
            .map(|p| p.iter().map(String::as_str).collect())
            .unwrap_or_default();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            if let Some(parents) = self.parents.get(current) {
                queue.extend(parents.iter().map(String::as_str));
            }
        }

        order.into_iter()
    }

    /// Strict descendants of a type.
    pub fn descendants<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.type_names()
            .filter(move |t| *t != type_name && self.is_subtype(t, type_name))
    }

    /// Constants of exactly this type (descendants are not merged in).
    pub fn constants_of(&self, type_name: &str) -> &[Variable] {
        self.constants
            .get(type_name)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// All constants, grouped by type.
    pub fn constants(&self) -> impl Iterator<Item = &Variable> {
        self.constants.values().flatten()
    }

    /// Pre-seeded bindings for rule placeholders named after a constant.
    ///
    /// Each constant `P: P` yields the binding `Placeholder(P: P) -> Variable(P: P)`.
    pub fn constants_mapping(&self) -> Mapping {
        self.constants()
            .map(|c| (Placeholder::typed(&c.name, &c.type_name), c.clone()))
            .collect()
    }
}
