//! FILENAME: core/parser/src/numeral.rs
//! PURPOSE: Converts the text the grammar collects for a number into an f64.
//! CONTEXT: Every number in an expression, whether typed as digits or taken
//! from a constant or a function result, passes through `NumeralBuffer` and
//! ends up in `parse_numeral`. Function results and constants are appended in
//! their textual form so they follow exactly the same path as typed digits.
//! Only a parenthesised group applies its sign to the value arithmetically.
//!
//! ACCEPTED SHAPES:
//! - [sign] digits [. digits]
//! - [sign] digits .
//! - [sign] digits [. digits] (e|E) [sign] digits
//! - [sign] digits [. digits] *10^ [sign] digits
//! - [sign] Infinity
//! - [sign] NaN

use once_cell::sync::Lazy;
use regex::Regex;

use crate::charset;
use crate::error::{EvaluationError, EvaluationErrorKind, EvaluationResult};

static NUMERAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[+-]?(?:(?P<mantissa>\d+(?:\.\d+)?)(?:\.|[eE][+-]?\d+|\*10\^(?P<power>[+-]?\d+))?|(?P<infinity>Infinity)|(?P<nan>NaN))$",
    )
    .expect("numeral pattern is valid")
});

/// Parses a complete numeral.
pub fn parse_numeral(text: &str) -> EvaluationResult<f64> {
    let captures = NUMERAL_PATTERN
        .captures(text)
        .ok_or_else(|| EvaluationError::numeral(text))?;

    let negative = text.starts_with(charset::MINUS);

    if captures.name("nan").is_some() {
        return Ok(f64::NAN);
    }

    if captures.name("infinity").is_some() {
        return Ok(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    // D*10^E is rewritten to DeE so the standard parser keeps full precision
    let normalized = match (captures.name("mantissa"), captures.name("power")) {
        (Some(mantissa), Some(power)) => {
            let sign = if negative { "-" } else { "" };
            format!("{}{}e{}", sign, mantissa.as_str(), power.as_str())
        }
        _ => text.to_string(),
    };

    normalized.parse::<f64>().map_err(|e| {
        EvaluationError::with_cause(
            EvaluationErrorKind::Numeral,
            format!("Failed to parse numeral: '{}'", text),
            e,
        )
    })
}

/// Formats `value` in a shape `parse_numeral` accepts.
pub fn format_numeral(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else {
        format!("{}", value)
    }
}

/// Accumulates the text of one number.
/// A number is an optional sign followed by either raw digits or a single
/// formatted value; the buffer does not check that order itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NumeralBuffer {
    text: String,
    has_decimal_point: bool,
}

impl NumeralBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sign(&mut self, sign: char) {
        self.text.push(sign);
    }

    /// The sign pushed before anything else, if any.
    pub fn sign(&self) -> Option<char> {
        self.text.chars().next().filter(|&ch| charset::is_sign(ch))
    }

    pub fn push_digit(&mut self, digit: char) {
        self.text.push(digit);
    }

    /// Appends the decimal point. A number has at most one.
    pub fn push_decimal_point(&mut self) -> EvaluationResult<()> {
        if self.has_decimal_point {
            return Err(EvaluationError::new(
                EvaluationErrorKind::Numeral,
                format!("Second decimal point in numeral: '{}.'", self.text),
            ));
        }

        self.text.push(charset::DECIMAL_POINT);
        self.has_decimal_point = true;
        Ok(())
    }

    /// Appends the textual form of `value` after whatever is pending. A sign
    /// before a negative value stays as written, so `-` then `-5` is `--5`
    /// and does not parse.
    pub fn push_value(&mut self, value: f64) {
        self.text.push_str(&format_numeral(value));
    }

    /// Applies the pending sign to `value` and keeps the result in its place.
    pub fn apply_sign(&mut self, value: f64) {
        let signed = match self.sign() {
            Some(charset::MINUS) => -value,
            _ => value,
        };
        self.text = format_numeral(signed);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn parse(&self) -> EvaluationResult<f64> {
        parse_numeral(&self.text)
    }
}
