//! FILENAME: core/engine/src/builtins.rs
//! PURPOSE: The declarations every default evaluator starts with.
//! CONTEXT: `default_registries` builds a fresh set of tables on each call;
//! there is no shared global registry to mutate by accident.
//!
//! OPERATORS:
//!   POLYNOMIAL  + -
//!   MONOMIAL    * / %
//!   FACTOR      ** & | ^ << >> >>>
//!
//! Bitwise operators work on 32-bit two's-complement integers and reject
//! operands with a fractional part. Shift counts are taken modulo 32.

use std::f64::consts;

use crate::declaration::{CallError, CallResult, Function, Operator, Priority};
use crate::registry::Registries;

/// Largest input `factorial` accepts.
pub const FACTORIAL_LIMIT: f64 = 127.0;

/// Builds the default constants, operators and functions.
pub fn default_registries() -> Registries {
    let mut registries = Registries::new();
    define_constants(&mut registries);
    define_operators(&mut registries);
    define_functions(&mut registries);
    registries
}

// ============================================================================
// CONSTANTS
// ============================================================================

fn define_constants(registries: &mut Registries) {
    let constants = registries.constants_mut();
    constants.define("NaN", f64::NAN);
    constants.define("PI", consts::PI);
    constants.define("TAU", consts::TAU);
    constants.define("E", consts::E);
    constants.define("Infinity", f64::INFINITY);
}

// ============================================================================
// OPERATORS
// ============================================================================

fn define_operators(registries: &mut Registries) {
    let operators = registries.operators_mut();

    operators.define("+", Operator::new(Priority::Polynomial, |x, y| Ok(x + y)));
    operators.define("-", Operator::new(Priority::Polynomial, |x, y| Ok(x - y)));

    operators.define("*", Operator::new(Priority::Monomial, |x, y| Ok(x * y)));
    operators.define("/", Operator::new(Priority::Monomial, |x, y| Ok(x / y)));
    operators.define("%", Operator::new(Priority::Monomial, |x, y| Ok(x % y)));

    operators.define("**", Operator::new(Priority::Factor, |x, y| Ok(js_pow(x, y))));
    operators.define(
        "&",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands("&", x, y)?;
            Ok(f64::from(to_int32(x) & to_int32(y)))
        }),
    );
    operators.define(
        "|",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands("|", x, y)?;
            Ok(f64::from(to_int32(x) | to_int32(y)))
        }),
    );
    operators.define(
        "^",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands("^", x, y)?;
            Ok(f64::from(to_int32(x) ^ to_int32(y)))
        }),
    );
    operators.define(
        "<<",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands("<<", x, y)?;
            Ok(f64::from(to_int32(x).wrapping_shl(shift_count(y))))
        }),
    );
    operators.define(
        ">>",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands(">>", x, y)?;
            Ok(f64::from(to_int32(x).wrapping_shr(shift_count(y))))
        }),
    );
    operators.define(
        ">>>",
        Operator::new(Priority::Factor, |x, y| {
            let (x, y) = integer_operands(">>>", x, y)?;
            Ok(f64::from(to_uint32(x).wrapping_shr(shift_count(y))))
        }),
    );
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

fn integer_operands(operator: &str, x: f64, y: f64) -> Result<(f64, f64), CallError> {
    if is_integral(x) && is_integral(y) {
        Ok((x, y))
    } else {
        Err(CallError::Type(format!(
            "Operator '{}' needs integral operands, got {} and {}",
            operator, x, y
        )))
    }
}

/// Wraps an integral value into 32 bits, keeping the low bits.
fn to_uint32(value: f64) -> u32 {
    value.rem_euclid(4_294_967_296.0) as u32
}

fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

fn shift_count(value: f64) -> u32 {
    to_uint32(value) & 31
}

// ============================================================================
// FUNCTIONS
// ============================================================================

fn define_functions(registries: &mut Registries) {
    let functions = registries.functions_mut();

    functions.define("random", Function::nullary(|| Ok(rand::random::<f64>())));

    let unary: [(&str, fn(f64) -> f64); 16] = [
        ("sqrt", f64::sqrt),
        ("cbrt", f64::cbrt),
        ("abs", f64::abs),
        ("floor", f64::floor),
        ("ceil", f64::ceil),
        ("round", round_half_up),
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("tan", f64::tan),
        ("asin", f64::asin),
        ("acos", f64::acos),
        ("atan", f64::atan),
        ("exp", f64::exp),
        ("to_degrees", f64::to_degrees),
        ("to_radians", f64::to_radians),
        ("log10", f64::log10),
    ];
    for (name, math) in unary {
        functions.define(name, Function::unary(move |x| Ok(math(x))));
    }

    functions.define("factorial", Function::unary(factorial));

    let binary: [(&str, fn(f64, f64) -> f64); 5] = [
        ("log", natural_log),
        ("atan2", f64::atan2),
        ("min", nan_min),
        ("max", nan_max),
        ("pow", js_pow),
    ];
    for (name, math) in binary {
        functions.define(name, Function::binary(move |x, y| Ok(math(x, y))));
    }
}

/// Rounds to the nearest integer, halves towards positive infinity.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn nan_min(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else {
        x.min(y)
    }
}

fn nan_max(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        f64::NAN
    } else {
        x.max(y)
    }
}

/// `x` raised to `y`. A NaN exponent, or a base of 1 or -1 with an infinite
/// exponent, gives NaN where `powf` would give 1.
fn js_pow(x: f64, y: f64) -> f64 {
    if y.is_nan() || (x.abs() == 1.0 && y.is_infinite()) {
        f64::NAN
    } else {
        x.powf(y)
    }
}

/// Natural logarithm of `x`. The second argument is accepted and ignored.
fn natural_log(x: f64, _base: f64) -> f64 {
    x.ln()
}

fn factorial(x: f64) -> CallResult {
    if !is_integral(x) {
        return Err(CallError::Type(format!("factorial needs an integer, got {}", x)));
    }
    if x < 0.0 {
        return Err(CallError::Type(format!("factorial of a negative number: {}", x)));
    }
    if x > FACTORIAL_LIMIT {
        return Err(CallError::Failed(format!(
            "factorial is limited to {}!, got {}",
            FACTORIAL_LIMIT, x
        )));
    }

    Ok((2..=x as u32).fold(1.0, |product, n| product * f64::from(n)))
}
