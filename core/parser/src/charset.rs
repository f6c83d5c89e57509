//! FILENAME: core/parser/src/charset.rs
//! PURPOSE: Fixed character definitions for expressions.
//! CONTEXT: These characters are structural and cannot be redefined at
//! runtime. Everything else (operators, functions, constants) is looked up
//! in the declaration registry.

/// Characters skipped between meaningful parts of an expression.
pub const IGNORED: [char; 2] = [' ', '\n'];

pub const PLUS: char = '+';
pub const MINUS: char = '-';

/// Sign characters a number may start with, in the order they are tried.
pub const SIGNS: [char; 2] = [PLUS, MINUS];

pub const DECIMAL_POINT: char = '.';

/// Argument separator inside a function call.
pub const COMMA: char = ',';

pub const OPEN_PAREN: char = '(';
pub const CLOSE_PAREN: char = ')';

/// Literal forms of the punctuation, for cursor matching.
pub const OPEN_PAREN_LITERAL: &str = "(";
pub const CLOSE_PAREN_LITERAL: &str = ")";
pub const SIGN_LITERALS: [&str; 2] = ["+", "-"];

/// Characters that may never appear in a declaration name.
pub const RESERVED: [char; 3] = [OPEN_PAREN, CLOSE_PAREN, COMMA];

/// Returns true if `ch` is skipped between parts of an expression.
pub fn is_ignored(ch: char) -> bool {
    IGNORED.contains(&ch)
}

/// Returns true if `ch` can appear in a raw digit run.
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_sign(ch: char) -> bool {
    SIGNS.contains(&ch)
}

/// Returns the first reserved character found in `name`, if any.
pub fn find_reserved(name: &str) -> Option<char> {
    name.chars().find(|ch| RESERVED.contains(ch))
}
