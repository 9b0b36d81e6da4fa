//! Shared scanning rules. Each language supplies a [`Dialect`]: its comment
//! syntax, quote characters, operators and vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::highlight::{Category, TokenizerState, stream::LineStream};

static EXPRESSION_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0[xX][0-9a-fA-F]+[uU]?|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?[uU]?)")
        .expect("valid number pattern")
});

static SQL_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
});

/// `YYYY-MM-DD`, optionally with a time and zone
static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?")
        .expect("valid date pattern")
});

static BIND_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:[A-Za-z_][A-Za-z0-9_]*").expect("valid bind pattern"));

/// `LAST_N_DAYS`, `NEXT_N_FISCAL_QUARTERS`, ...
pub(crate) static RELATIVE_DATE_FAMILY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:LAST|NEXT)_N_(?:DAYS|WEEKS|MONTHS|QUARTERS|YEARS|FISCAL_QUARTERS|FISCAL_YEARS)$")
        .expect("valid relative date pattern")
});

static DATE_ARGUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:\s*\d+").expect("valid date argument pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberStyle {
    /// Hex and `u`-suffixed integers allowed
    Expression,
    /// Plain decimals; ISO dates take precedence
    Sql,
}

/// Static description of one language's lexical surface.
#[derive(Debug)]
pub(crate) struct Dialect {
    pub line_comment: &'static str,
    pub block_comments: bool,
    pub quotes: &'static [char],
    /// Upper-case words before vocabulary lookup
    pub case_insensitive: bool,
    pub numbers: NumberStyle,
    /// `:name` bind parameters
    pub bind_params: bool,
    /// Multi-character operators, matched before single characters
    pub operators: &'static [&'static str],
    pub operator_chars: &'static str,
    pub punctuation: &'static str,
    pub literals: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub date_literals: &'static [&'static str],
    /// Whether the `LAST_N_{UNIT}` / `NEXT_N_{UNIT}` family is recognized
    pub relative_dates: bool,
    /// Word that tags as a namespace when directly followed by `.`
    pub namespace: Option<&'static str>,
    pub context_variables: &'static [&'static str],
}

/// Scans one token. Never fails; unrecognized characters are consumed
/// without a category.
pub(crate) fn scan(
    dialect: &Dialect,
    stream: &mut LineStream<'_>,
    state: &mut TokenizerState,
) -> Option<Category> {
    stream.begin_token();

    if let Some(quote) = state.open_quote {
        return Some(read_string(stream, state, quote));
    }
    if state.in_block_comment {
        read_block_comment(stream, state);
        return Some(Category::Comment);
    }

    if stream.eat_space() {
        return None;
    }

    if stream.match_str(dialect.line_comment) {
        stream.skip_to_end();
        return Some(Category::Comment);
    }
    if dialect.block_comments && stream.match_str("/*") {
        state.in_block_comment = true;
        read_block_comment(stream, state);
        return Some(Category::Comment);
    }

    let ch = stream.peek()?;

    if dialect.quotes.contains(&ch) {
        stream.advance();
        return Some(read_string(stream, state, ch));
    }

    if dialect.numbers == NumberStyle::Sql && stream.match_regex(&ISO_DATE).is_some() {
        return Some(Category::Date);
    }

    if dialect.bind_params && ch == ':' && stream.match_regex(&BIND_PARAM).is_some() {
        return Some(Category::Variable);
    }

    let starts_number =
        ch.is_ascii_digit() || (ch == '.' && stream.peek_second().is_some_and(|c| c.is_ascii_digit()));
    if starts_number {
        let pattern = match dialect.numbers {
            NumberStyle::Expression => &*EXPRESSION_NUMBER,
            NumberStyle::Sql => &*SQL_NUMBER,
        };
        if stream.match_regex(pattern).is_some() {
            return Some(Category::Number);
        }
    }

    for op in dialect.operators {
        if stream.match_str(op) {
            return Some(Category::Operator);
        }
    }
    if dialect.operator_chars.contains(ch) {
        stream.advance();
        return Some(Category::Operator);
    }
    if dialect.punctuation.contains(ch) {
        stream.advance();
        return Some(Category::Punctuation);
    }

    if ch.is_alphabetic() || ch == '_' {
        stream.eat_while(|c| c.is_alphanumeric() || c == '_');
        return Some(classify_word(dialect, stream));
    }

    stream.advance();
    None
}

fn classify_word(dialect: &Dialect, stream: &mut LineStream<'_>) -> Category {
    let word = stream.current();
    let upper;
    let key = if dialect.case_insensitive {
        upper = word.to_ascii_uppercase();
        upper.as_str()
    } else {
        word
    };

    if dialect.literals.contains(&key) {
        return Category::Bool;
    }
    if dialect.keywords.contains(&key) {
        return Category::Keyword;
    }
    if dialect.functions.contains(&key) {
        return Category::Function;
    }
    if dialect.date_literals.contains(&key) {
        return Category::Date;
    }
    if dialect.relative_dates && RELATIVE_DATE_FAMILY.is_match(key) {
        stream.match_regex(&DATE_ARGUMENT);
        return Category::Date;
    }
    if dialect.namespace == Some(word) && stream.peek() == Some('.') {
        return Category::Namespace;
    }
    if dialect.context_variables.contains(&word) {
        return Category::Variable;
    }
    Category::Identifier
}

/// Consumes string content up to and including the closing quote. A
/// backslash escapes whatever follows it, the quote included. Reaching the
/// end of the line leaves the string open in `state`.
fn read_string(stream: &mut LineStream<'_>, state: &mut TokenizerState, quote: char) -> Category {
    while let Some(ch) = stream.advance() {
        if ch == '\\' {
            stream.advance();
            continue;
        }
        if ch == quote {
            state.open_quote = None;
            return Category::String;
        }
    }
    state.open_quote = Some(quote);
    Category::String
}

fn read_block_comment(stream: &mut LineStream<'_>, state: &mut TokenizerState) {
    loop {
        if stream.match_str("*/") {
            state.in_block_comment = false;
            return;
        }
        if stream.advance().is_none() {
            return;
        }
    }
}
