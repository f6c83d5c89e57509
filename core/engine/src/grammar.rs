//! FILENAME: core/engine/src/grammar.rs
//! PURPOSE: Recursive descent parser that evaluates while it scans.
//! CONTEXT: No tokens and no AST. Each rule reads the cursor, consults the
//! registry for the names it may accept at that point, and returns the
//! value of what it consumed. Operator precedence comes from which tier's
//! operator set a rule tries, so a newly registered operator takes part in
//! the very next evaluation.
//!
//! GRAMMAR:
//!   polynomial    --> monomial ( POLYNOMIAL_OPERATOR monomial )*
//!   monomial      --> factor_chain ( MONOMIAL_OPERATOR factor_chain )*
//!   factor_chain  --> factor ( FACTOR_OPERATOR factor )*
//!   factor        --> "(" polynomial ")" | number
//!   number        --> [sign] ( function_call | CONSTANT | "(" polynomial ")" | DIGITS [ "." DIGITS ] )
//!   function_call --> FUNCTION "(" [ polynomial ( "," polynomial )* ] ")"
//!
//! All binary rules are left-associative. Operator names are tried longest
//! first within a tier.

use calcexp_parser::{
    charset, Cursor, EvaluationError, EvaluationErrorKind, EvaluationResult, NumeralBuffer,
};
use smallvec::SmallVec;

use crate::declaration::{Function, Priority};
use crate::logging::log_trace;
use crate::registry::RegistryView;

/// Argument values of one function call.
pub type Arguments = SmallVec<[f64; 4]>;

type Rule<'c, 'r> = fn(&mut Grammar<'c, 'r>) -> EvaluationResult<f64>;

pub struct Grammar<'c, 'r> {
    cursor: &'c mut Cursor,
    registries: RegistryView<'r>,
}

impl<'c, 'r> Grammar<'c, 'r> {
    pub fn new(cursor: &'c mut Cursor, registries: RegistryView<'r>) -> Self {
        Grammar { cursor, registries }
    }

    /// Evaluates the whole expression loaded into the cursor.
    pub fn evaluate_top_level(&mut self) -> EvaluationResult<f64> {
        if self.cursor.location() != 0 {
            return Err(EvaluationError::reentrant());
        }

        if self.cursor.is_over() {
            return Err(EvaluationError::syntax("Cannot evaluate an empty expression"));
        }

        let value = self.polynomial()?;

        self.cursor.skip_ignored();
        if !self.cursor.is_over() {
            return Err(EvaluationError::syntax(format!(
                "Unexpected characters after expression: '{}'",
                self.cursor.remaining()
            )));
        }

        Ok(value)
    }

    fn polynomial(&mut self) -> EvaluationResult<f64> {
        let first = self.monomial()?;
        self.fold_tier(Priority::Polynomial, first, Self::monomial)
    }

    fn monomial(&mut self) -> EvaluationResult<f64> {
        let first = self.factor_chain()?;
        self.fold_tier(Priority::Monomial, first, Self::factor_chain)
    }

    fn factor_chain(&mut self) -> EvaluationResult<f64> {
        let first = self.factor()?;
        self.fold_tier(Priority::Factor, first, Self::factor)
    }

    /// Applies `operator operand` pairs of one tier to `first`, left to right,
    /// until no operator of the tier follows.
    fn fold_tier(&mut self, priority: Priority, first: f64, operand: Rule<'c, 'r>) -> EvaluationResult<f64> {
        let registries = self.registries;
        let mut value = first;

        'tier: while !self.cursor.is_over() {
            for (name, operator) in registries.operators_of(priority) {
                if !self.cursor.match_literal(name) {
                    continue;
                }

                let rhs = operand(self)?;
                log_trace!("GRAM", "{} {} {} [{}]", value, name, rhs, priority);

                value = operator.apply(value, rhs).map_err(|e| {
                    EvaluationError::with_cause(EvaluationErrorKind::Operator, priority.failure_message(name), e)
                })?;
                continue 'tier;
            }

            break;
        }

        Ok(value)
    }

    fn factor(&mut self) -> EvaluationResult<f64> {
        let current = self.cursor.next_char(true)?;

        if current != charset::OPEN_PAREN {
            self.cursor.retreat();
            return self.number();
        }

        let value = self.polynomial()?;

        self.cursor.skip_ignored();
        if self.cursor.is_over() {
            return Err(EvaluationError::syntax("Unclosed parenthesis"));
        }

        let closing = self.cursor.next_char(true)?;
        if closing == charset::CLOSE_PAREN {
            self.cursor.skip_ignored();
            Ok(value)
        } else {
            Err(EvaluationError::syntax(format!(
                "Unclosed parenthesis: found '{}'",
                closing
            )))
        }
    }

    fn number(&mut self) -> EvaluationResult<f64> {
        let mut buffer = NumeralBuffer::new();

        for sign in charset::SIGNS {
            if self.cursor.match_char(sign) {
                buffer.push_sign(sign);
                break;
            }
        }

        if let Some((name, function)) = self.take_function() {
            let args = self.arguments()?;
            log_trace!("GRAM", "call {}({:?})", name, args.as_slice());

            let result = function.call(&args).map_err(|e| {
                EvaluationError::with_cause(
                    EvaluationErrorKind::Call,
                    format!("Function '{}' failed", name),
                    e,
                )
            })?;
            buffer.push_value(result);
        } else if let Some((_, value)) = self.take_constant() {
            buffer.push_value(value);
        } else if self.starts_group() {
            let value = self.polynomial()?;
            buffer.apply_sign(value);
        } else {
            self.digits(&mut buffer)?;
        }

        buffer.parse()
    }

    /// True if a sign or an opening parenthesis follows.
    fn starts_group(&mut self) -> bool {
        charset::SIGN_LITERALS
            .iter()
            .any(|sign| self.cursor.lookahead(&[*sign]))
            || self.cursor.lookahead(&[charset::OPEN_PAREN_LITERAL])
    }

    /// Collects a run of digits with at most one decimal point.
    fn digits(&mut self, buffer: &mut NumeralBuffer) -> EvaluationResult<()> {
        while !self.cursor.is_over() {
            let current = self.cursor.next_char(false)?;

            if charset::is_digit(current) {
                buffer.push_digit(current);
            } else if current == charset::DECIMAL_POINT {
                buffer.push_decimal_point()?;
            } else {
                self.cursor.retreat();
                break;
            }
        }

        Ok(())
    }

    fn arguments(&mut self) -> EvaluationResult<Arguments> {
        let mut args = Arguments::new();

        if !self.cursor.match_char(charset::OPEN_PAREN) {
            return Err(EvaluationError::syntax("Function call requires parentheses"));
        }

        if self.cursor.match_char(charset::CLOSE_PAREN) {
            return Ok(args);
        }

        loop {
            if self.cursor.is_over() {
                return Err(EvaluationError::syntax("Unclosed argument list"));
            }

            args.push(self.polynomial()?);

            self.cursor.skip_ignored();
            if self.cursor.is_over() {
                return Err(EvaluationError::syntax("Unclosed argument list"));
            }

            match self.cursor.next_char(true)? {
                charset::COMMA => {}
                charset::CLOSE_PAREN => {
                    self.cursor.skip_ignored();
                    return Ok(args);
                }
                other => {
                    return Err(EvaluationError::syntax(format!(
                        "Missing separator between arguments: found '{}'",
                        other
                    )))
                }
            }
        }
    }

    /// Finds the longest function name followed by "(" without consuming it.
    fn find_function(&mut self) -> Option<(&'r str, &'r Function)> {
        let registries = self.registries;
        registries
            .functions()
            .longest_first()
            .find(|(name, _)| self.cursor.lookahead(&[*name, charset::OPEN_PAREN_LITERAL]))
    }

    pub fn is_function(&mut self) -> bool {
        self.find_function().is_some()
    }

    /// Same search as `is_function`, consuming the name on success.
    fn take_function(&mut self) -> Option<(&'r str, &'r Function)> {
        let found = self.find_function()?;
        self.cursor.match_literal(found.0);
        Some(found)
    }

    fn find_constant(&mut self) -> Option<(&'r str, f64)> {
        let registries = self.registries;
        registries
            .constants()
            .longest_first()
            .find(|(name, _)| self.cursor.lookahead(&[*name]))
            .map(|(name, value)| (name, *value))
    }

    pub fn is_constant(&mut self) -> bool {
        self.find_constant().is_some()
    }

    /// Same search as `is_constant`, consuming the name on success.
    fn take_constant(&mut self) -> Option<(&'r str, f64)> {
        let found = self.find_constant()?;
        self.cursor.match_literal(found.0);
        Some(found)
    }
}
