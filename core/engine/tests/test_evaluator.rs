//! FILENAME: tests/test_evaluator.rs
//! Integration tests for evaluating expressions through the public API.

mod common;

use calcexp_engine::{EvaluationErrorKind, Evaluator, EvaluatorConfig, FrozenEvaluator, Function};
use common::TestHarness;

// ============================================================================
// ARITHMETIC
// ============================================================================

#[test]
fn test_basic_arithmetic() {
    let harness = TestHarness::new();
    assert_eq!(harness.eval("1 + 1"), 2.0);
    assert_eq!(harness.eval("3 * (2 + 7) + -14 / 2"), 20.0);
    assert_eq!(harness.eval("7 % 4"), 3.0);
}

#[test]
fn test_bitwise_operators() {
    let harness = TestHarness::new();
    assert_eq!(harness.eval("100 & 6"), 4.0);
    assert_eq!(harness.eval("2 << 3 + 10 | 4"), 30.0);
    assert_eq!(harness.eval("5 ^ 1"), 4.0);
    assert_eq!(harness.eval("16 >>> 2"), 4.0);
    assert_eq!(harness.eval("1 << 33"), 2.0);
}

#[test]
fn test_bitwise_rejects_fractions() {
    let harness = TestHarness::with_config(true, false);
    let err = harness.eval_err("2.5 | 1");
    assert_eq!(err.kind(), EvaluationErrorKind::Operator);
}

#[test]
fn test_math_functions() {
    let harness = TestHarness::new();
    harness.assert_close("sin(to_radians(45)) * 2", 2f64.sqrt());
    harness.assert_close("atan2(1, 1)", std::f64::consts::FRAC_PI_4);
    harness.assert_close("cbrt(27) + log10(1000)", 6.0);
    harness.assert_close("exp(0) + floor(2.7) + ceil(2.1)", 6.0);
    assert_eq!(harness.eval("1 / Infinity"), 0.0);
}

#[test]
fn test_exponent_is_not_typed_numeral_syntax() {
    // Exponent forms are only produced by values, never read from digits
    let harness = TestHarness::with_config(true, false);
    assert_eq!(harness.eval_err("1e3").kind(), EvaluationErrorKind::Syntax);
}

// ============================================================================
// USER DECLARATIONS
// ============================================================================

#[test]
fn test_user_function_composition() {
    let harness = TestHarness::with_user_declarations();
    assert_eq!(harness.eval("double(2) * (double(5) + 2 ** 3)"), 72.0);
    assert_eq!(harness.eval("sum(1, 2, 3, 4, 5, 6, 7, 8, 9, 10)"), 55.0);
    assert_eq!(harness.eval("double(sum(1, 2) + 1)"), 8.0);
}

#[test]
fn test_user_operator_and_constants() {
    let harness = TestHarness::with_user_declarations();
    assert_eq!(harness.eval("(50 + 50) == (20 + 80)"), 1.0);
    assert_eq!(harness.eval("1 == 2"), 0.0);
    assert_eq!(harness.eval("myIntelligence"), 2.0);
    assert_eq!(harness.eval("57 + 57"), 2.0);
}

#[test]
fn test_user_function_failure_is_a_call_error() {
    let mut harness = TestHarness::with_user_declarations();
    harness.evaluator.config_mut().allow_nan = true;

    let err = harness.eval_err("mean()");
    assert_eq!(err.kind(), EvaluationErrorKind::Call);
    assert_eq!(err.message(), "Function 'mean' failed");
    assert_eq!(harness.eval("mean(2, 4)"), 3.0);
}

#[test]
fn test_unregistered_declaration_is_gone() {
    let mut harness = TestHarness::with_user_declarations();
    harness.evaluator.unregister_function("double").unwrap();
    assert!(harness.evaluator.evaluate("double(2)").is_err());
}

// ============================================================================
// NAN POLICY
// ============================================================================

#[test]
fn test_nan_policy_matrix() {
    let strict = TestHarness::new();
    assert!(strict.eval_err("0/0").is_not_a_number());
    assert!(strict.eval_err("(1 + 2").is_not_a_number());

    let lenient = TestHarness::with_config(true, false);
    assert!(lenient.eval("0/0").is_nan());
    assert_eq!(lenient.eval_err("(1 + 2").kind(), EvaluationErrorKind::Syntax);

    let silent = TestHarness::with_config(true, true);
    assert!(silent.eval("0/0").is_nan());
    assert!(silent.eval("(1 + 2").is_nan());
    assert!(silent.eval("1 +").is_nan());
}

#[test]
fn test_config_from_json() {
    let config: EvaluatorConfig = serde_json::from_str(r#"{"allowNan": true, "neverThrows": true}"#).unwrap();
    let evaluator = Evaluator::new(config);
    assert!(evaluator.evaluate(")").unwrap().is_nan());
}

// ============================================================================
// INDEPENDENCE
// ============================================================================

#[test]
fn test_clone_then_mutate_leaves_source() {
    let source = TestHarness::with_user_declarations();
    let mut copy = source.evaluator.clone();
    copy.unregister_function("double").unwrap();
    copy.register_function("double", Function::unary(|x| Ok(x * 3.0))).unwrap();

    assert_eq!(source.eval("double(2)"), 4.0);
    assert_eq!(copy.evaluate("double(2)").unwrap(), 6.0);
}

#[test]
fn test_frozen_evaluator_matches_mutable_one() {
    let harness = TestHarness::with_user_declarations();
    let frozen = harness.evaluator.freeze();
    for expression in ["sum(1, 2, 3)", "57 + 57", "2 << 3 + 10 | 4"] {
        assert_eq!(frozen.evaluate(expression).unwrap(), harness.eval(expression));
    }
}

#[test]
fn test_default_frozen_evaluator() {
    let frozen = FrozenEvaluator::default();
    assert!(frozen.evaluate("PI == PI").is_err());
    assert_eq!(frozen.evaluate("floor(max(PI, E))").unwrap(), 3.0);
}

#[test]
fn test_evaluator_is_reusable_after_failure() {
    let harness = TestHarness::with_config(true, false);
    assert!(harness.evaluator.evaluate("(((").is_err());
    assert_eq!(harness.eval("1 + 2"), 3.0);
}
