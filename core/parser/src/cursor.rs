//! FILENAME: core/parser/src/cursor.rs
//! PURPOSE: Character-level cursor over the expression being evaluated.
//! CONTEXT: There is no token stream. The grammar drives the cursor directly,
//! asking it for single characters or for literal matches, and backtracks by
//! restoring the location. Because nothing is cut into tokens ahead of time,
//! operator names of any length may share prefixes (`>>` and `>>>`); the
//! registry's longest-first ordering decides which one the grammar tries.
//!
//! OPERATIONS:
//! - next_char:     consume one character, optionally skipping ignored ones
//! - match_literal: consume a literal and the ignored characters around it
//! - retreat:       undo one consumed character
//! - skip_ignored:  consume a run of ignored characters
//! - lookahead:     test a sequence of literals without consuming anything

use crate::charset;
use crate::error::{EvaluationError, EvaluationResult};

#[derive(Debug, Default, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    location: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cursor positioned at the start of `expression`.
    pub fn from_expression(expression: &str) -> Self {
        let mut cursor = Self::new();
        cursor.load(expression);
        cursor
    }

    /// Replaces the expression and rewinds to its start.
    pub fn load(&mut self, expression: &str) {
        self.chars.clear();
        self.chars.extend(expression.chars());
        self.location = 0;
    }

    /// Clears the expression and rewinds.
    pub fn reset(&mut self) {
        self.chars.clear();
        self.location = 0;
    }

    pub fn location(&self) -> usize {
        self.location
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns true once every character has been consumed.
    pub fn is_over(&self) -> bool {
        self.location >= self.chars.len()
    }

    /// The unconsumed part of the expression.
    pub fn remaining(&self) -> String {
        self.rest().iter().collect()
    }

    fn rest(&self) -> &[char] {
        &self.chars[self.location.min(self.chars.len())..]
    }

    /// Consumes and returns the character at the cursor.
    /// With `skip_ignored`, ignored characters are consumed and passed over.
    pub fn next_char(&mut self, skip_ignored: bool) -> EvaluationResult<char> {
        loop {
            let current = match self.chars.get(self.location) {
                Some(&ch) => ch,
                None => return Err(EvaluationError::out_of_range(self.location)),
            };
            self.location += 1;

            if !(skip_ignored && charset::is_ignored(current)) {
                return Ok(current);
            }
        }
    }

    /// Consumes `text` if the input continues with it after any ignored
    /// characters. Ignored characters following the match are consumed too.
    /// On a miss the cursor does not move.
    pub fn match_literal(&mut self, text: &str) -> bool {
        let saved = self.location;
        self.skip_ignored();

        if self.starts_with(text) {
            self.location += text.chars().count();
            self.skip_ignored();
            true
        } else {
            self.location = saved;
            false
        }
    }

    pub fn match_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.match_literal(ch.encode_utf8(&mut buf))
    }

    fn starts_with(&self, text: &str) -> bool {
        let mut rest = self.rest().iter();
        text.chars().all(|expected| rest.next() == Some(&expected))
    }

    /// Moves back over exactly one character.
    pub fn retreat(&mut self) {
        self.location = self.location.saturating_sub(1);
    }

    pub fn skip_ignored(&mut self) {
        while matches!(self.chars.get(self.location), Some(&ch) if charset::is_ignored(ch)) {
            self.location += 1;
        }
    }

    /// Returns whether `literals` match one after another from here.
    /// The cursor is left where it was either way.
    pub fn lookahead(&mut self, literals: &[&str]) -> bool {
        let saved = self.location;
        let matched = literals.iter().all(|literal| self.match_literal(literal));
        self.location = saved;
        matched
    }
}
