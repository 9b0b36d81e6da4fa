//! # Syntax highlighting
//!
//! Line-oriented tokenizers for the three embedded languages. A tokenizer
//! holds no state of its own: whatever must survive a line break (an open
//! string, an open block comment) lives in a [`TokenizerState`] the caller
//! threads from one line to the next.
//!
//! ```
//! use formula_kit::highlight::{highlight_line, Category, ExpressionTokenizer, Tokenizer};
//!
//! let tokenizer = ExpressionTokenizer;
//! let mut state = tokenizer.start_state();
//! let spans = highlight_line(&tokenizer, "record.Amount > 100", &mut state);
//! assert_eq!(spans[0].category, Category::Variable);
//! assert_eq!(spans.last().map(|s| s.category), Some(Category::Number));
//! ```

pub mod dml;
pub mod expression;
pub mod query;
mod scanner;
pub mod stream;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use dml::DmlTokenizer;
pub use expression::ExpressionTokenizer;
pub use query::QueryTokenizer;
pub use stream::LineStream;

/// Highlighting category of a scanned run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    String,
    Number,
    Operator,
    Punctuation,
    Keyword,
    /// Boolean and null literals
    Bool,
    Comment,
    /// Reserved context variables and bound parameters
    Variable,
    Identifier,
    Namespace,
    Function,
    Date,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::String => "string",
            Category::Number => "number",
            Category::Operator => "operator",
            Category::Punctuation => "punctuation",
            Category::Keyword => "keyword",
            Category::Bool => "bool",
            Category::Comment => "comment",
            Category::Variable => "variable",
            Category::Identifier => "identifier",
            Category::Namespace => "namespace",
            Category::Function => "function",
            Category::Date => "date",
        };
        write!(f, "{}", name)
    }
}

/// Carry-over between lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerState {
    /// Quote character of a string left open at the end of the previous line
    pub open_quote: Option<char>,
    pub in_block_comment: bool,
}

impl TokenizerState {
    pub fn in_string(&self) -> bool {
        self.open_quote.is_some()
    }
}

pub trait Tokenizer {
    fn start_state(&self) -> TokenizerState {
        TokenizerState::default()
    }

    /// Consumes one run from `stream` and returns its category, or `None`
    /// for whitespace and unrecognized characters. Consumes at least one
    /// character unless the stream is at end of line.
    fn token(&self, stream: &mut LineStream<'_>, state: &mut TokenizerState) -> Option<Category>;
}

/// A categorized byte range within one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

/// Tokenizes a whole line, updating `state` for the next one.
pub fn highlight_line<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    line: &str,
    state: &mut TokenizerState,
) -> Vec<Span> {
    let mut stream = LineStream::new(line);
    let mut spans = Vec::new();

    while !stream.eol() {
        let before = stream.pos();
        let category = tokenizer.token(&mut stream, state);
        if stream.pos() == before {
            stream.advance();
        }
        if let Some(category) = category {
            spans.push(Span {
                start: stream.start(),
                end: stream.pos(),
                category,
            });
        }
    }
    spans
}

/// Tokenizes every line of `text` from a fresh state. Span offsets are
/// relative to their own line.
pub fn highlight_document<T: Tokenizer + ?Sized>(tokenizer: &T, text: &str) -> Vec<Vec<Span>> {
    let mut state = tokenizer.start_state();
    text.lines()
        .map(|line| highlight_line(tokenizer, line, &mut state))
        .collect()
}

/// One of the three embedded languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Expression,
    Query,
    Dml,
}

impl Language {
    pub fn tokenizer(&self) -> &'static dyn Tokenizer {
        match self {
            Language::Expression => &ExpressionTokenizer,
            Language::Query => &QueryTokenizer,
            Language::Dml => &DmlTokenizer,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cel" | "expression" => Ok(Language::Expression),
            "soql" | "query" => Ok(Language::Query),
            "dml" | "sql" => Ok(Language::Dml),
            other => Err(format!("Unknown language: {} (expected cel, soql or dml)", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Expression => "cel",
            Language::Query => "soql",
            Language::Dml => "dml",
        };
        write!(f, "{}", name)
    }
}
