//! FILENAME: core/engine/src/declaration.rs
//! PURPOSE: The three kinds of names an expression can refer to.
//! CONTEXT: Constants, functions and operators live in separate registry
//! tables. Functions carry their arity as part of the callable itself, so a
//! call with the wrong argument count is caught here and reported as a
//! `CallError` instead of being truncated or padded.

use std::fmt;
use std::rc::Rc;

use calcexp_parser::EvaluationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a function or operator callback.
#[derive(Debug, Error)]
pub enum CallError {
    /// An operand had the wrong shape, e.g. a fraction passed to a bitwise operator.
    #[error("Type error: {0}")]
    Type(String),

    #[error("Expected {expected} argument(s), got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The callback evaluated another expression and that failed.
    #[error("Nested evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("{0}")]
    Failed(String),
}

pub type CallResult = Result<f64, CallError>;

/// Binding strength of an operator, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Between monomials, e.g. `+` and `-`.
    Polynomial,
    /// Between factors, e.g. `*`, `/` and `%`.
    Monomial,
    /// Directly between two factors, e.g. `**` and the bitwise operators.
    Factor,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Polynomial, Priority::Monomial, Priority::Factor];

    pub fn name(self) -> &'static str {
        match self {
            Priority::Polynomial => "POLYNOMIAL",
            Priority::Monomial => "MONOMIAL",
            Priority::Factor => "FACTOR",
        }
    }

    /// Message used when an operator of this tier fails.
    pub fn failure_message(self, operator: &str) -> String {
        match self {
            Priority::Polynomial => format!("Operator '{}' between terms failed", operator),
            Priority::Monomial => format!("Operator '{}' between factors failed", operator),
            Priority::Factor => format!("Operator '{}' on a factor failed", operator),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    Zero,
    One,
    Two,
    Variable,
}

impl Arity {
    /// Exact argument count, or None for variable arity.
    pub fn expected(self) -> Option<usize> {
        match self {
            Arity::Zero => Some(0),
            Arity::One => Some(1),
            Arity::Two => Some(2),
            Arity::Variable => None,
        }
    }
}

#[derive(Clone)]
enum Callable {
    Zero(Rc<dyn Fn() -> CallResult>),
    One(Rc<dyn Fn(f64) -> CallResult>),
    Two(Rc<dyn Fn(f64, f64) -> CallResult>),
    Variable(Rc<dyn Fn(&[f64]) -> CallResult>),
}

/// A named function. The callable's shape fixes its arity.
#[derive(Clone)]
pub struct Function {
    callable: Callable,
}

impl Function {
    pub fn nullary(call: impl Fn() -> CallResult + 'static) -> Self {
        Function {
            callable: Callable::Zero(Rc::new(call)),
        }
    }

    pub fn unary(call: impl Fn(f64) -> CallResult + 'static) -> Self {
        Function {
            callable: Callable::One(Rc::new(call)),
        }
    }

    pub fn binary(call: impl Fn(f64, f64) -> CallResult + 'static) -> Self {
        Function {
            callable: Callable::Two(Rc::new(call)),
        }
    }

    /// A function taking any number of arguments, including none.
    pub fn variadic(call: impl Fn(&[f64]) -> CallResult + 'static) -> Self {
        Function {
            callable: Callable::Variable(Rc::new(call)),
        }
    }

    pub fn arity(&self) -> Arity {
        match self.callable {
            Callable::Zero(_) => Arity::Zero,
            Callable::One(_) => Arity::One,
            Callable::Two(_) => Arity::Two,
            Callable::Variable(_) => Arity::Variable,
        }
    }

    /// Invokes the function. `args` must match the arity exactly.
    pub fn call(&self, args: &[f64]) -> CallResult {
        match (&self.callable, args) {
            (Callable::Zero(call), []) => call(),
            (Callable::One(call), [x]) => call(*x),
            (Callable::Two(call), [x, y]) => call(*x, *y),
            (Callable::Variable(call), args) => call(args),
            _ => Err(CallError::ArityMismatch {
                expected: self.arity().expected().unwrap_or(args.len()),
                found: args.len(),
            }),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("arity", &self.arity()).finish()
    }
}

/// A binary infix operator.
#[derive(Clone)]
pub struct Operator {
    priority: Priority,
    operate: Rc<dyn Fn(f64, f64) -> CallResult>,
}

impl Operator {
    pub fn new(priority: Priority, operate: impl Fn(f64, f64) -> CallResult + 'static) -> Self {
        Operator {
            priority,
            operate: Rc::new(operate),
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn apply(&self, x: f64, y: f64) -> CallResult {
        (self.operate)(x, y)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator").field("priority", &self.priority).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Constant,
    Function,
    Operator,
}

impl DeclarationKind {
    pub fn name(self) -> &'static str {
        match self {
            DeclarationKind::Constant => "constant",
            DeclarationKind::Function => "function",
            DeclarationKind::Operator => "operator",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Any declaration, for the generic `declare` entry point.
#[derive(Debug, Clone)]
pub enum Declaration {
    Constant(f64),
    Function(Function),
    Operator(Operator),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Constant(_) => DeclarationKind::Constant,
            Declaration::Function(_) => DeclarationKind::Function,
            Declaration::Operator(_) => DeclarationKind::Operator,
        }
    }
}

impl From<f64> for Declaration {
    fn from(value: f64) -> Self {
        Declaration::Constant(value)
    }
}

impl From<Function> for Declaration {
    fn from(function: Function) -> Self {
        Declaration::Function(function)
    }
}

impl From<Operator> for Declaration {
    fn from(operator: Operator) -> Self {
        Declaration::Operator(operator)
    }
}
