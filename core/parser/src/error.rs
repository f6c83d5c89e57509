//! FILENAME: core/parser/src/error.rs
//! PURPOSE: Error raised while scanning, parsing or evaluating an expression.
//! CONTEXT: Every stage of an evaluation reports through this one type. The
//! kind tells callers which stage failed; the optional cause keeps the
//! underlying failure (a callback error, a nested evaluation error) reachable
//! through `std::error::Error::source`.

use thiserror::Error;

/// A boxed error kept as the cause of an `EvaluationError`.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which stage of an evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationErrorKind {
    /// The cursor was asked for a character past the end of the expression.
    OutOfRange,
    /// Malformed expression: empty input, unclosed parenthesis, trailing characters.
    Syntax,
    /// Collected text did not have the shape of a numeral.
    Numeral,
    /// A registered function failed or was called with the wrong argument count.
    Call,
    /// A registered operator failed while combining two operands.
    Operator,
    /// The evaluator was entered while it was already evaluating.
    Reentrant,
    /// The expression produced NaN and NaN is not allowed.
    NotANumber,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct EvaluationError {
    kind: EvaluationErrorKind,
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;

impl EvaluationError {
    pub fn new(kind: EvaluationErrorKind, message: impl Into<String>) -> Self {
        EvaluationError {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates an error that wraps an underlying failure.
    pub fn with_cause(
        kind: EvaluationErrorKind,
        message: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        EvaluationError {
            kind,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(EvaluationErrorKind::Syntax, message)
    }

    pub fn out_of_range(location: usize) -> Self {
        Self::new(
            EvaluationErrorKind::OutOfRange,
            format!("Unexpected end of expression at position {}", location),
        )
    }

    pub fn numeral(text: &str) -> Self {
        Self::new(
            EvaluationErrorKind::Numeral,
            format!("Failed to parse numeral: '{}'", text),
        )
    }

    pub fn reentrant() -> Self {
        Self::new(
            EvaluationErrorKind::Reentrant,
            "Evaluator is already evaluating an expression; it may have called evaluate() on itself",
        )
    }

    /// The distinguished error for a disallowed NaN result. `cause` is the
    /// failure that was masked, if the NaN stands in for one.
    pub fn not_a_number(cause: Option<EvaluationError>) -> Self {
        EvaluationError {
            kind: EvaluationErrorKind::NotANumber,
            message: "Expression produced NaN".to_string(),
            cause: cause.map(|e| Box::new(e) as BoxedCause),
        }
    }

    pub fn kind(&self) -> EvaluationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_not_a_number(&self) -> bool {
        self.kind == EvaluationErrorKind::NotANumber
    }
}
