use crate::highlight::scanner::{self, Dialect, NumberStyle};
use crate::highlight::{Category, LineStream, Tokenizer, TokenizerState};

pub const LITERALS: &[&str] = &["TRUE", "FALSE", "NULL"];

pub const KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "AND",
    "OR",
    "NOT",
    "IN",
    "LIKE",
    "INCLUDES",
    "EXCLUDES",
    "ORDER",
    "GROUP",
    "BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "ASC",
    "DESC",
    "NULLS",
    "FIRST",
    "LAST",
    "WITH",
    "TYPEOF",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "USING",
    "SCOPE",
    "FOR",
    "VIEW",
    "REFERENCE",
    "UPDATE",
    "TRACKING",
    "VIEWSTAT",
    "ROLLUP",
    "CUBE",
    "SECURITY_ENFORCED",
    "USER_MODE",
    "SYSTEM_MODE",
    "ALL",
    "ROWS",
];

pub const FUNCTIONS: &[&str] = &[
    "COUNT",
    "COUNT_DISTINCT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "CALENDAR_MONTH",
    "CALENDAR_QUARTER",
    "CALENDAR_YEAR",
    "DAY_IN_MONTH",
    "DAY_IN_WEEK",
    "DAY_IN_YEAR",
    "DAY_ONLY",
    "FISCAL_MONTH",
    "FISCAL_QUARTER",
    "FISCAL_YEAR",
    "HOUR_IN_DAY",
    "WEEK_IN_MONTH",
    "WEEK_IN_YEAR",
    "TOLABEL",
    "CONVERTCURRENCY",
    "CONVERTTIMEZONE",
    "FORMAT",
    "GROUPING",
    "DISTANCE",
    "GEOLOCATION",
];

/// Relative date literals shared by both SQL-like languages. The
/// `LAST_N_DAYS:n` family is matched by pattern instead.
pub const DATE_LITERALS: &[&str] = &[
    "YESTERDAY",
    "TODAY",
    "TOMORROW",
    "LAST_WEEK",
    "THIS_WEEK",
    "NEXT_WEEK",
    "LAST_MONTH",
    "THIS_MONTH",
    "NEXT_MONTH",
    "LAST_90_DAYS",
    "NEXT_90_DAYS",
    "LAST_QUARTER",
    "THIS_QUARTER",
    "NEXT_QUARTER",
    "LAST_YEAR",
    "THIS_YEAR",
    "NEXT_YEAR",
    "LAST_FISCAL_QUARTER",
    "THIS_FISCAL_QUARTER",
    "NEXT_FISCAL_QUARTER",
    "LAST_FISCAL_YEAR",
    "THIS_FISCAL_YEAR",
    "NEXT_FISCAL_YEAR",
];

/// Parameterized relative dates offered by completion with a default count.
pub const DATE_TEMPLATES: &[&str] = &[
    "LAST_N_DAYS:7",
    "NEXT_N_DAYS:7",
    "LAST_N_WEEKS:4",
    "NEXT_N_WEEKS:4",
    "LAST_N_MONTHS:3",
    "NEXT_N_MONTHS:3",
    "LAST_N_QUARTERS:2",
    "NEXT_N_QUARTERS:2",
    "LAST_N_YEARS:1",
    "NEXT_N_YEARS:1",
    "LAST_N_FISCAL_QUARTERS:2",
    "NEXT_N_FISCAL_QUARTERS:2",
    "LAST_N_FISCAL_YEARS:1",
    "NEXT_N_FISCAL_YEARS:1",
];

/// Multi-character comparison operators shared by both SQL-like languages.
pub const OPERATORS: &[&str] = &["!=", "<>", ">=", "<="];

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

/// Tokenizer for the read-query language.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTokenizer;

impl Tokenizer for QueryTokenizer {
    fn token(&self, stream: &mut LineStream<'_>, state: &mut TokenizerState) -> Option<Category> {
        scanner::scan(&DIALECT, stream, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::highlight_line;

    fn categories(line: &str) -> Vec<(String, Category)> {
        let mut state = TokenizerState::default();
        highlight_line(&QueryTokenizer, line, &mut state)
            .into_iter()
            .map(|s| (line[s.start..s.end].to_string(), s.category))
            .collect()
    }

    #[test]
    fn test_keywords_any_case() {
        let spans = categories("select Id from Account");
        assert_eq!(spans[0].1, Category::Keyword);
        assert_eq!(spans[1].1, Category::Identifier);
        assert_eq!(spans[2].1, Category::Keyword);
    }

    #[test]
    fn test_relative_date_consumes_count() {
        let spans = categories("CreatedDate = last_n_days:30");
        assert_eq!(spans[2], ("last_n_days:30".to_string(), Category::Date));
    }

    #[test]
    fn test_iso_date_before_number() {
        let spans = categories("CloseDate > 2024-01-15T10:00:00Z AND Amount > 5");
        assert_eq!(spans[2], ("2024-01-15T10:00:00Z".to_string(), Category::Date));
        assert_eq!(spans.last().unwrap().1, Category::Number);
    }

    #[test]
    fn test_bind_parameter() {
        let spans = categories("WHERE Id IN :ids");
        assert_eq!(spans[3], (":ids".to_string(), Category::Variable));
    }

    #[test]
    fn test_double_quote_is_not_a_string() {
        let mut state = TokenizerState::default();
        highlight_line(&QueryTokenizer, "Name = \"abc", &mut state);
        assert!(!state.in_string());
    }
}
