//! Structural limits checked before an expression reaches the evaluator.
//!
//! Parsing and evaluation recurse once per nesting level and per operator,
//! and a stack overflow aborts the process. Expressions past these limits
//! are rejected up front with the offset of the first character over the
//! limit.

use thiserror::Error;

/// Deepest bracket nesting accepted.
pub const MAX_NESTING: usize = 64;

/// Most operator characters accepted in one expression.
pub const MAX_OPERATOR_CHARS: usize = 512;

const OPERATOR_CHARS: &str = "+-*/%!<>=&|?:.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("Expression nesting exceeds {limit} levels")]
    Nesting { limit: usize, position: usize },

    #[error("Expression has more than {limit} operators")]
    Operators { limit: usize, position: usize },
}

impl LimitError {
    /// Character offset of the first character past the limit.
    pub fn position(&self) -> usize {
        match self {
            LimitError::Nesting { position, .. } | LimitError::Operators { position, .. } => {
                *position
            }
        }
    }
}

/// Scans `source`, skipping string literals and `//` comments, and fails on
/// the first bracket or operator that goes over a limit.
pub fn check(source: &str) -> Result<(), LimitError> {
    let chars: Vec<char> = source.chars().collect();
    let mut depth = 0usize;
    let mut operators = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                i = skip_string(&chars, i);
                continue;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '(' | '[' | '{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(LimitError::Nesting {
                        limit: MAX_NESTING,
                        position: i,
                    });
                }
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if OPERATOR_CHARS.contains(c) => {
                operators += 1;
                if operators > MAX_OPERATOR_CHARS {
                    return Err(LimitError::Operators {
                        limit: MAX_OPERATOR_CHARS,
                        position: i,
                    });
                }
            }
            _ => {}
        }
        i += 1;
    }
    Ok(())
}

/// Returns the index just past the string literal opening at `start`.
/// Unterminated literals run to the end of the input.
fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let triple = chars.get(start + 1) == Some(&quote) && chars.get(start + 2) == Some(&quote);
    let mut i = if triple { start + 3 } else { start + 1 };

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => {
                if !triple {
                    return i + 1;
                }
                if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                    return i + 3;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    chars.len()
}
