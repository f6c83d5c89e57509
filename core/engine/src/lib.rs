//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the calcexp expression engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//! The scanning layer and the error type come from `calcexp-parser`.

pub mod builtins;
pub mod config;
pub mod declaration;
pub mod evaluator;
pub mod grammar;
pub mod logging;
pub mod registry;


// Re-export commonly used types at the crate root
pub use builtins::default_registries;
pub use calcexp_parser::{EvaluationError, EvaluationErrorKind, EvaluationResult};
pub use config::EvaluatorConfig;
pub use declaration::{
    Arity, CallError, CallResult, Declaration, DeclarationKind, Function, Operator, Priority,
};
pub use evaluator::{Evaluator, FrozenEvaluator};
pub use grammar::{Arguments, Grammar};
pub use registry::{
    FrozenRegistries, Registries, Registry, RegistryError, RegistryResult, RegistryView,
};
