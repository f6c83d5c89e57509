//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the calcexp scanning layer.
//! CONTEXT: calcexp never cuts an expression into tokens. The grammar in the
//! engine crate drives a character cursor directly and turns the characters
//! it collects into numbers through the numeral parser. This crate holds
//! those two pieces plus the error type every stage reports.
//!
//! PIPELINE: Expression String --> Cursor <--> Grammar (engine) --> NumeralBuffer --> f64
//!
//! SUPPORTED NUMERALS:
//! - Integers and decimals: 42, 3.14
//! - Signed forms: -7, +2.5
//! - Exponents: 1e10, 2.5E-3
//! - Mantissa times power of ten: 3*10^8
//! - The literals Infinity and NaN

pub mod charset;
pub mod cursor;
pub mod error;
pub mod numeral;


// Re-export commonly used types for convenience
pub use cursor::Cursor;
pub use error::{BoxedCause, EvaluationError, EvaluationErrorKind, EvaluationResult};
pub use numeral::{format_numeral, parse_numeral, NumeralBuffer};
