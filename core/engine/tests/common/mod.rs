//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for calcexp engine integration tests.
#![allow(dead_code)]

use calcexp_engine::{
    CallError, EvaluationError, Evaluator, EvaluatorConfig, Function, Priority,
};

/// Test harness wrapping one evaluator.
pub struct TestHarness {
    pub evaluator: Evaluator,
}

impl TestHarness {
    /// Create a harness with the default declarations and configuration.
    pub fn new() -> Self {
        TestHarness {
            evaluator: Evaluator::default(),
        }
    }

    pub fn with_config(allow_nan: bool, never_throws: bool) -> Self {
        TestHarness {
            evaluator: Evaluator::new(EvaluatorConfig::new(allow_nan, never_throws)),
        }
    }

    /// Create a harness with a few user declarations on top of the defaults.
    pub fn with_user_declarations() -> Self {
        let mut harness = Self::new();
        harness.populate_user_declarations();
        harness
    }

    fn populate_user_declarations(&mut self) {
        let evaluator = &mut self.evaluator;

        evaluator
            .register_function("double", Function::unary(|x| Ok(x * 2.0)))
            .unwrap();
        evaluator
            .register_function("sum", Function::variadic(|args| Ok(args.iter().sum())))
            .unwrap();
        evaluator
            .register_function(
                "mean",
                Function::variadic(|args| {
                    if args.is_empty() {
                        return Err(CallError::Failed("mean of nothing".to_string()));
                    }
                    Ok(args.iter().sum::<f64>() / args.len() as f64)
                }),
            )
            .unwrap();
        evaluator
            .register_operator("==", Priority::Factor, |x, y| {
                Ok(if x == y { 1.0 } else { 0.0 })
            })
            .unwrap();
        evaluator.register_constant("myIntelligence", 2.0).unwrap();
        evaluator.register_constant("57", 1.0).unwrap();
    }

    pub fn eval(&self, expression: &str) -> f64 {
        self.evaluator
            .evaluate(expression)
            .unwrap_or_else(|e| panic!("'{}' failed: {}", expression, e))
    }

    pub fn eval_err(&self, expression: &str) -> EvaluationError {
        match self.evaluator.evaluate(expression) {
            Ok(value) => panic!("'{}' should fail, got {}", expression, value),
            Err(e) => e,
        }
    }

    /// Asserts `expression` evaluates to `expected` within 1e-9.
    pub fn assert_close(&self, expression: &str, expected: f64) {
        let actual = self.eval(expression);
        assert!(
            (actual - expected).abs() < 1e-9,
            "'{}' = {}, expected {}",
            expression,
            actual,
            expected
        );
    }
}
