//! FILENAME: core/engine/src/registry.rs
//! PURPOSE: Name tables for constants, functions and operators.
//! CONTEXT: The grammar asks the registry at every step whether the input
//! continues with a known name. Names are handed out longest first: with
//! both `>>` and `>>>` registered, trying `>>` first would strand the last
//! `>` and fail the parse, so the order is kept sorted on every mutation.
//!
//! CAPABILITIES:
//! - `Registries` owns the three tables and can register and unregister.
//! - `FrozenRegistries` owns an independent snapshot and can only be read.
//! - `RegistryView` is the read-only handle the grammar works with; both
//!   owners hand one out.

use std::cmp::Ordering;

use calcexp_parser::charset;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::declaration::{CallResult, Declaration, DeclarationKind, Function, Operator, Priority};
use crate::logging::log_debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Name '{name}' contains the reserved character '{character}'")]
    ReservedCharacter { name: String, character: char },

    #[error("Declaration names must not be empty")]
    EmptyName,

    #[error("{kind} '{name}' is already declared")]
    Duplicate { kind: DeclarationKind, name: String },

    #[error("No {kind} named '{name}'")]
    NotFound { kind: DeclarationKind, name: String },

    #[error("The {kind} '{name}' exists but does not satisfy the condition")]
    ConditionMismatch { kind: DeclarationKind, name: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Longer names first; equal lengths by name so the order is stable.
fn longest_first_order(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

/// One declaration table.
#[derive(Debug, Clone)]
pub struct Registry<D> {
    kind: DeclarationKind,
    entries: FxHashMap<String, D>,
    /// Every key of `entries`, sorted by `longest_first_order`.
    longest_first: Vec<String>,
}

impl<D> Registry<D> {
    fn new(kind: DeclarationKind) -> Self {
        Registry {
            kind,
            entries: FxHashMap::default(),
            longest_first: Vec::new(),
        }
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All names, longest first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.longest_first.iter().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> RegistryResult<&D> {
        self.entries.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Like `get`, but the declaration must also satisfy `condition`.
    pub fn get_where(&self, name: &str, condition: impl FnOnce(&D) -> bool) -> RegistryResult<&D> {
        let declaration = self.get(name)?;
        if condition(declaration) {
            Ok(declaration)
        } else {
            Err(RegistryError::ConditionMismatch {
                kind: self.kind,
                name: name.to_string(),
            })
        }
    }

    /// Every entry, longest name first.
    pub fn longest_first(&self) -> impl Iterator<Item = (&str, &D)> {
        self.longest_first_where(|_| true)
    }

    /// Entries satisfying `predicate`, longest name first.
    pub fn longest_first_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = (&'a str, &'a D)> + 'a
    where
        P: Fn(&D) -> bool + 'a,
    {
        self.longest_first.iter().filter_map(move |name| {
            let declaration = self.entries.get(name)?;
            predicate(declaration).then_some((name.as_str(), declaration))
        })
    }

    fn validate(&self, name: &str) -> RegistryResult<()> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if let Some(character) = charset::find_reserved(name) {
            return Err(RegistryError::ReservedCharacter {
                name: name.to_string(),
                character,
            });
        }

        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }

        Ok(())
    }

    /// Adds a declaration under a new, valid name.
    pub fn register(&mut self, name: &str, declaration: D) -> RegistryResult<()> {
        self.validate(name)?;
        log_debug!("REG", "register {} '{}'", self.kind, name);
        self.define(name, declaration);
        Ok(())
    }

    /// Registers several declarations, stopping at the first invalid one.
    /// Entries before the failing one stay registered.
    pub fn register_all<'n>(&mut self, declarations: impl IntoIterator<Item = (&'n str, D)>) -> RegistryResult<()> {
        for (name, declaration) in declarations {
            self.register(name, declaration)?;
        }
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> RegistryResult<D> {
        let declaration = self.entries.remove(name).ok_or_else(|| RegistryError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })?;

        if let Ok(position) = self
            .longest_first
            .binary_search_by(|probe| longest_first_order(probe, name))
        {
            self.longest_first.remove(position);
        }

        log_debug!("REG", "unregister {} '{}'", self.kind, name);
        Ok(declaration)
    }

    /// Inserts or replaces without validating the name. Callers guarantee
    /// the name came from another registry or a fixed builtin table.
    pub(crate) fn define(&mut self, name: &str, declaration: D) {
        if self.entries.insert(name.to_string(), declaration).is_none() {
            let position = self
                .longest_first
                .binary_search_by(|probe| longest_first_order(probe, name))
                .unwrap_or_else(|position| position);
            self.longest_first.insert(position, name.to_string());
        }
    }
}

impl<D: Clone> Registry<D> {
    /// Copies every entry into `target`. Names already in `target` are
    /// replaced when `overwrite` is set and skipped otherwise.
    fn copy_into(&self, target: &mut Registry<D>, overwrite: bool) {
        for (name, declaration) in self.longest_first() {
            if target.contains(name) && !overwrite {
                continue;
            }
            target.define(name, declaration.clone());
        }
    }
}

/// The three declaration tables, mutable.
#[derive(Debug)]
pub struct Registries {
    constants: Registry<f64>,
    functions: Registry<Function>,
    operators: Registry<Operator>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Registries {
    /// Deep copy through `copy_to`; the clone shares nothing mutable with `self`.
    fn clone(&self) -> Self {
        let mut copy = Registries::new();
        self.copy_to(&mut copy, true);
        copy
    }
}

impl Registries {
    pub fn new() -> Self {
        Registries {
            constants: Registry::new(DeclarationKind::Constant),
            functions: Registry::new(DeclarationKind::Function),
            operators: Registry::new(DeclarationKind::Operator),
        }
    }

    /// Read-only handle for lookups.
    pub fn view(&self) -> RegistryView<'_> {
        RegistryView { registries: self }
    }

    pub fn constants(&self) -> &Registry<f64> {
        &self.constants
    }

    pub fn functions(&self) -> &Registry<Function> {
        &self.functions
    }

    pub fn operators(&self) -> &Registry<Operator> {
        &self.operators
    }

    pub fn constants_mut(&mut self) -> &mut Registry<f64> {
        &mut self.constants
    }

    pub fn functions_mut(&mut self) -> &mut Registry<Function> {
        &mut self.functions
    }

    pub fn operators_mut(&mut self) -> &mut Registry<Operator> {
        &mut self.operators
    }

    pub fn register_constant(&mut self, name: &str, value: f64) -> RegistryResult<()> {
        self.constants.register(name, value)
    }

    pub fn register_function(&mut self, name: &str, function: Function) -> RegistryResult<()> {
        self.functions.register(name, function)
    }

    pub fn register_operator(
        &mut self,
        name: &str,
        priority: Priority,
        operate: impl Fn(f64, f64) -> CallResult + 'static,
    ) -> RegistryResult<()> {
        self.operators.register(name, Operator::new(priority, operate))
    }

    pub fn unregister_constant(&mut self, name: &str) -> RegistryResult<()> {
        self.constants.unregister(name).map(|_| ())
    }

    pub fn unregister_function(&mut self, name: &str) -> RegistryResult<()> {
        self.functions.unregister(name).map(|_| ())
    }

    pub fn unregister_operator(&mut self, name: &str) -> RegistryResult<()> {
        self.operators.unregister(name).map(|_| ())
    }

    /// Registers any kind of declaration in its own table.
    pub fn declare(&mut self, name: &str, declaration: impl Into<Declaration>) -> RegistryResult<()> {
        match declaration.into() {
            Declaration::Constant(value) => self.constants.register(name, value),
            Declaration::Function(function) => self.functions.register(name, function),
            Declaration::Operator(operator) => self.operators.register(name, operator),
        }
    }

    /// Removes a declaration of the given kind and returns it.
    pub fn remove(&mut self, kind: DeclarationKind, name: &str) -> RegistryResult<Declaration> {
        match kind {
            DeclarationKind::Constant => self.constants.unregister(name).map(Declaration::Constant),
            DeclarationKind::Function => self.functions.unregister(name).map(Declaration::Function),
            DeclarationKind::Operator => self.operators.unregister(name).map(Declaration::Operator),
        }
    }

    /// Copies every declaration of every kind into `target`.
    pub fn copy_to(&self, target: &mut Registries, overwrite: bool) {
        self.view().copy_to(target, overwrite);
    }

    /// Independent read-only snapshot of the current declarations.
    pub fn freeze(&self) -> FrozenRegistries {
        FrozenRegistries::snapshot(self.view())
    }
}

/// Read-only snapshot of a set of declarations.
#[derive(Debug, Clone)]
pub struct FrozenRegistries {
    inner: Registries,
}

impl FrozenRegistries {
    /// Deep-copies `source`; later changes to the source are not seen.
    pub fn snapshot(source: RegistryView<'_>) -> Self {
        let mut inner = Registries::new();
        source.copy_to(&mut inner, true);
        FrozenRegistries { inner }
    }

    pub fn view(&self) -> RegistryView<'_> {
        self.inner.view()
    }

    pub fn constants(&self) -> &Registry<f64> {
        self.inner.constants()
    }

    pub fn functions(&self) -> &Registry<Function> {
        self.inner.functions()
    }

    pub fn operators(&self) -> &Registry<Operator> {
        self.inner.operators()
    }

    /// Independent mutable copy.
    pub fn thaw(&self) -> Registries {
        self.inner.clone()
    }

    pub fn copy_to(&self, target: &mut Registries, overwrite: bool) {
        self.inner.copy_to(target, overwrite);
    }
}

impl From<Registries> for FrozenRegistries {
    /// Takes ownership, so no copy is needed to guarantee independence.
    fn from(inner: Registries) -> Self {
        FrozenRegistries { inner }
    }
}

/// Read-only handle over a set of declaration tables.
#[derive(Debug, Clone, Copy)]
pub struct RegistryView<'r> {
    registries: &'r Registries,
}

impl<'r> RegistryView<'r> {
    pub fn constants(self) -> &'r Registry<f64> {
        &self.registries.constants
    }

    pub fn functions(self) -> &'r Registry<Function> {
        &self.registries.functions
    }

    pub fn operators(self) -> &'r Registry<Operator> {
        &self.registries.operators
    }

    /// Operators of one tier, longest name first.
    pub fn operators_of(self, priority: Priority) -> impl Iterator<Item = (&'r str, &'r Operator)> {
        self.registries
            .operators
            .longest_first_where(move |operator| operator.priority() == priority)
    }

    pub fn copy_to(self, target: &mut Registries, overwrite: bool) {
        self.registries.constants.copy_into(&mut target.constants, overwrite);
        self.registries.functions.copy_into(&mut target.functions, overwrite);
        self.registries.operators.copy_into(&mut target.operators, overwrite);
    }
}
