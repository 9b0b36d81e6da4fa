//! # Cursor context
//!
//! Decides which coarse syntactic zone a cursor sits in, so completion can
//! offer the right candidates. None of this parses: the expression
//! classifier pattern-matches the current line, the SQL-like classifiers
//! look for the right-most clause keyword before the cursor.
//!
//! Offsets are byte offsets into the document. A cursor past the end, or
//! inside a multi-byte character, is moved back to the nearest boundary.

pub mod dml;
pub mod expression;
pub mod query;

use regex::Regex;

pub use dml::{DmlZone, classify_dml};
pub use expression::{ExpressionContext, ExpressionZone, classify_expression};
pub use query::{QueryZone, classify_query};

/// Zone of a SQL-like statement plus the word being completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseContext<Z> {
    pub zone: Z,
    /// Start of the word before the cursor
    pub from: usize,
    /// The word before the cursor, dotted path included (`Owner.Na`)
    pub partial: String,
    /// Everything up to and including the last dot of `partial` (`Owner.`)
    pub qualifier: Option<String>,
}

impl<Z> ClauseContext<Z> {
    fn new(zone: Z, text: &str, pos: usize) -> Self {
        let from = word_start(text, pos, |c| is_word_char(c) || c == '.');
        let partial = text[from..pos].to_string();
        let qualifier = partial
            .rfind('.')
            .map(|dot| partial[..=dot].to_string());
        ClauseContext {
            zone,
            from,
            partial,
            qualifier,
        }
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Moves `pos` back onto a character boundary within `doc`.
pub(crate) fn clamp_cursor(doc: &str, pos: usize) -> usize {
    let mut pos = pos.min(doc.len());
    while !doc.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Start of the run of `is_word` characters ending at `pos`.
pub(crate) fn word_start(text: &str, pos: usize, is_word: impl Fn(char) -> bool) -> usize {
    text[..pos]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word(c))
        .last()
        .map_or(pos, |(i, _)| i)
}

/// The zone of the keyword whose last occurrence in `text` starts
/// furthest right, with the byte offset just past that occurrence.
pub(crate) fn rightmost_clause<Z: Copy>(text: &str, clauses: &[(Regex, Z)]) -> Option<(Z, usize)> {
    clauses
        .iter()
        .filter_map(|(pattern, zone)| {
            pattern
                .find_iter(text)
                .last()
                .map(|m| (m.start(), m.end(), *zone))
        })
        .max_by_key(|&(start, _, _)| start)
        .map(|(_, end, zone)| (zone, end))
}

/// Case-insensitive, word-bounded pattern for a clause keyword; spaces in
/// `keyword` match any run of whitespace.
pub(crate) fn clause_pattern(keyword: &str) -> Regex {
    let body = keyword.split_whitespace().collect::<Vec<_>>().join(r"\s+");
    Regex::new(&format!(r"(?i)\b{}\b", body)).expect("clause keywords are valid patterns")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("a + rec", 7, is_word_char), 4);
        assert_eq!(word_start("a + ", 4, is_word_char), 4);
        assert_eq!(word_start("Owner.Na", 8, |c| is_word_char(c) || c == '.'), 0);
    }

    #[test]
    fn test_clamp_cursor() {
        assert_eq!(clamp_cursor("abc", 10), 3);
        assert_eq!(clamp_cursor("é", 1), 0);
    }

    #[test]
    fn test_qualifier() {
        let context = ClauseContext::new((), "SELECT Owner.Na", 15);
        assert_eq!(context.from, 7);
        assert_eq!(context.partial, "Owner.Na");
        assert_eq!(context.qualifier.as_deref(), Some("Owner."));
    }
}
