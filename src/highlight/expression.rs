use crate::highlight::scanner::{self, Dialect, NumberStyle};
use crate::highlight::{Category, LineStream, Tokenizer, TokenizerState};

pub const LITERALS: &[&str] = &["true", "false", "null"];

pub const KEYWORDS: &[&str] = &["in"];

/// Built-in functions, macros and receiver methods.
pub const FUNCTIONS: &[&str] = &[
    "size",
    "int",
    "uint",
    "double",
    "string",
    "bool",
    "bytes",
    "type",
    "dyn",
    "has",
    "matches",
    "contains",
    "startsWith",
    "endsWith",
    "lowerAscii",
    "upperAscii",
    "trim",
    "replace",
    "split",
    "join",
    "indexOf",
    "all",
    "exists",
    "exists_one",
    "map",
    "filter",
];

pub const CONTEXT_VARIABLES: &[&str] = &["record", "old", "user", "now"];

pub const NAMESPACE: &str = "fn";

pub const OPERATORS: &[&str] = &["&&", "||", "==", "!=", ">=", "<="];

static DIALECT: Dialect = Dialect {
    line_comment: "//",
    block_comments: true,
    quotes: &['"', '\''],
    case_insensitive: false,
    numbers: NumberStyle::Expression,
    bind_params: false,
    operators: OPERATORS,
    operator_chars: "+-*/%<>!?:=",
    punctuation: "()[]{},.",
    literals: LITERALS,
    keywords: KEYWORDS,
    functions: FUNCTIONS,
    date_literals: &[],
    relative_dates: false,
    namespace: Some(NAMESPACE),
    context_variables: CONTEXT_VARIABLES,
};

/// Tokenizer for the expression language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionTokenizer;

impl Tokenizer for ExpressionTokenizer {
    fn token(&self, stream: &mut LineStream<'_>, state: &mut TokenizerState) -> Option<Category> {
        scanner::scan(&DIALECT, stream, state)
    }
}
