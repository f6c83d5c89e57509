//! FILENAME: core/engine/src/evaluator.rs
//! PURPOSE: Public entry point that evaluates expression strings.
//! CONTEXT: An evaluator pairs a set of declaration tables with a
//! configuration and a scanning session. `Evaluator` can change its
//! declarations between evaluations; `FrozenEvaluator` cannot. Both run the
//! same grammar over a `RegistryView` and apply the same NaN / error policy.
//!
//! An evaluator is single-threaded and not reentrant. A callback that calls
//! `evaluate` on the evaluator currently running it gets a `Reentrant` error,
//! settled by the configuration like any other failure. A callback may use a
//! different evaluator (for example a clone) instead.

use std::cell::RefCell;

use calcexp_parser::{Cursor, EvaluationError, EvaluationResult};

use crate::builtins::default_registries;
use crate::config::EvaluatorConfig;
use crate::declaration::{CallResult, Declaration, Function, Priority};
use crate::grammar::Grammar;
use crate::logging::{log_enter, log_exit, log_warn};
use crate::registry::{FrozenRegistries, Registries, RegistryResult, RegistryView};

/// Scanning state of one evaluator. Busy while an evaluation runs.
#[derive(Debug, Default)]
struct Session {
    cursor: RefCell<Cursor>,
}

impl Session {
    fn run(&self, registries: RegistryView<'_>, config: &EvaluatorConfig, expression: &str) -> EvaluationResult<f64> {
        let Ok(mut cursor) = self.cursor.try_borrow_mut() else {
            log_warn!("EVAL", "rejected nested evaluate of '{}'", expression);
            return config.settle(Err(EvaluationError::reentrant()));
        };

        log_enter!("EVAL", "evaluate", "'{}'", expression);

        cursor.load(expression);
        let outcome = Grammar::new(&mut cursor, registries).evaluate_top_level();
        cursor.reset();
        drop(cursor);

        match &outcome {
            Ok(value) => log_exit!("EVAL", "evaluate", "= {}", value),
            Err(e) => log_exit!("EVAL", "evaluate", "failed: {}", e),
        }

        config.settle(outcome)
    }
}

// ============================================================================
// MUTABLE EVALUATOR
// ============================================================================

/// Evaluator whose declarations can be changed between evaluations.
#[derive(Debug)]
pub struct Evaluator {
    config: EvaluatorConfig,
    registries: Registries,
    session: Session,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl Clone for Evaluator {
    /// Deep-copies the declarations; the clone gets its own session.
    fn clone(&self) -> Self {
        Self::with_registries(self.config, self.registries.clone())
    }
}

impl Evaluator {
    /// Evaluator with the default declarations.
    pub fn new(config: EvaluatorConfig) -> Self {
        Self::with_registries(config, default_registries())
    }

    /// Evaluator with the default declarations and default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Evaluator owning exactly `registries`.
    pub fn with_registries(config: EvaluatorConfig, registries: Registries) -> Self {
        Evaluator {
            config,
            registries,
            session: Session::default(),
        }
    }

    /// Evaluator whose declarations are copied from `source`.
    pub fn from_source(config: EvaluatorConfig, source: RegistryView<'_>) -> Self {
        let mut registries = Registries::new();
        source.copy_to(&mut registries, true);
        Self::with_registries(config, registries)
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EvaluatorConfig {
        &mut self.config
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    /// Evaluates `expression` to a number.
    pub fn evaluate(&self, expression: &str) -> EvaluationResult<f64> {
        self.session.run(self.registries.view(), &self.config, expression)
    }

    pub fn register_constant(&mut self, name: &str, value: f64) -> RegistryResult<()> {
        self.registries.register_constant(name, value)
    }

    pub fn register_function(&mut self, name: &str, function: Function) -> RegistryResult<()> {
        self.registries.register_function(name, function)
    }

    pub fn register_operator(
        &mut self,
        name: &str,
        priority: Priority,
        operate: impl Fn(f64, f64) -> CallResult + 'static,
    ) -> RegistryResult<()> {
        self.registries.register_operator(name, priority, operate)
    }

    pub fn unregister_constant(&mut self, name: &str) -> RegistryResult<()> {
        self.registries.unregister_constant(name)
    }

    pub fn unregister_function(&mut self, name: &str) -> RegistryResult<()> {
        self.registries.unregister_function(name)
    }

    pub fn unregister_operator(&mut self, name: &str) -> RegistryResult<()> {
        self.registries.unregister_operator(name)
    }

    pub fn declare(&mut self, name: &str, declaration: impl Into<Declaration>) -> RegistryResult<()> {
        self.registries.declare(name, declaration)
    }

    /// Read-only evaluator over a snapshot of the current declarations.
    pub fn freeze(&self) -> FrozenEvaluator {
        FrozenEvaluator::with_registries(self.config, self.registries.freeze())
    }
}

// ============================================================================
// FROZEN EVALUATOR
// ============================================================================

/// Evaluator whose declarations are fixed at construction.
#[derive(Debug)]
pub struct FrozenEvaluator {
    config: EvaluatorConfig,
    registries: FrozenRegistries,
    session: Session,
}

impl Default for FrozenEvaluator {
    fn default() -> Self {
        Self::with_registries(EvaluatorConfig::default(), default_registries().into())
    }
}

impl Clone for FrozenEvaluator {
    fn clone(&self) -> Self {
        Self::with_registries(self.config, self.registries.clone())
    }
}

impl FrozenEvaluator {
    /// Starts from the default declarations, lets `initializer` adjust them,
    /// then freezes the result.
    pub fn build<F>(config: EvaluatorConfig, initializer: F) -> RegistryResult<Self>
    where
        F: FnOnce(&mut Registries) -> RegistryResult<()>,
    {
        let mut registries = default_registries();
        initializer(&mut registries)?;
        Ok(Self::with_registries(config, registries.into()))
    }

    pub fn with_registries(config: EvaluatorConfig, registries: FrozenRegistries) -> Self {
        FrozenEvaluator {
            config,
            registries,
            session: Session::default(),
        }
    }

    /// Evaluator over a snapshot of `source`.
    pub fn from_source(config: EvaluatorConfig, source: RegistryView<'_>) -> Self {
        Self::with_registries(config, FrozenRegistries::snapshot(source))
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn registries(&self) -> &FrozenRegistries {
        &self.registries
    }

    pub fn evaluate(&self, expression: &str) -> EvaluationResult<f64> {
        self.session.run(self.registries.view(), &self.config, expression)
    }

    /// Mutable evaluator over a copy of these declarations.
    pub fn thaw(&self) -> Evaluator {
        Evaluator::with_registries(self.config, self.registries.thaw())
    }
}
