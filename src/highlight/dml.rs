use crate::highlight::query::{DATE_LITERALS, OPERATORS};
use crate::highlight::scanner::{self, Dialect, NumberStyle};
use crate::highlight::{Category, LineStream, Tokenizer, TokenizerState};

pub const LITERALS: &[&str] = &["TRUE", "FALSE", "NULL"];

pub const KEYWORDS: &[&str] = &[
    "INSERT",
    "INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "DELETE",
    "FROM",
    "WHERE",
    "AND",
    "OR",
    "NOT",
    "IN",
    "IS",
    "LIKE",
    "BETWEEN",
    "UPSERT",
    "RETURNING",
    "DEFAULT",
    "ORDER",
    "BY",
    "LIMIT",
    "ASC",
    "DESC",
];

pub const FUNCTIONS: &[&str] = &[
    "COALESCE",
    "NOW",
    "UPPER",
    "LOWER",
    "TRIM",
    "LENGTH",
    "CONCAT",
    "SUBSTRING",
    "ROUND",
    "ABS",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
];

static DIALECT: Dialect = Dialect {
    line_comment: "--",
    block_comments: false,
    quotes: &['\''],
    case_insensitive: true,
    numbers: NumberStyle::Sql,
    bind_params: true,
    operators: OPERATORS,
    operator_chars: "=<>+-*/",
    punctuation: "(),.;",
    literals: LITERALS,
    keywords: KEYWORDS,
    functions: FUNCTIONS,
    date_literals: DATE_LITERALS,
    relative_dates: true,
    namespace: None,
    context_variables: &[],
};

/// Tokenizer for the data-manipulation language.
#[derive(Debug, Clone, Copy, Default)]
pub struct DmlTokenizer;

impl Tokenizer for DmlTokenizer {
    fn token(&self, stream: &mut LineStream<'_>, state: &mut TokenizerState) -> Option<Category> {
        scanner::scan(&DIALECT, stream, state)
    }
}

#[test]
fn test_insert_statement() {
    let line = "insert into Account (Name) values ('Acme')";
    let mut state = TokenizerState::default();
    let spans = crate::highlight::highlight_line(&DmlTokenizer, line, &mut state);
    let text: Vec<&str> = spans.iter().map(|s| &line[s.start..s.end]).collect();
    assert_eq!(
        text,
        vec!["insert", "into", "Account", "(", "Name", ")", "values", "(", "'Acme'", ")"]
    );
    assert_eq!(spans[0].category, Category::Keyword);
    assert_eq!(spans[8].category, Category::String);
    assert_eq!(state, TokenizerState::default());
}
