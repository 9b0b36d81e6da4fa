use crate::completion::{
    Candidates, CompletionKind, CompletionRequest, CompletionResult, QueryCompletionConfig,
    SQL_VALID_FOR, field_completion, object_completion,
};
use crate::context::{QueryZone, clamp_cursor, classify_query};
use crate::highlight::query::{DATE_LITERALS, DATE_TEMPLATES, FUNCTIONS, LITERALS};

const SELECT_KEYWORDS: &[&str] = &["FROM", "TYPEOF", "DISTINCT"];

const FROM_KEYWORDS: &[&str] = &[
    "WHERE",
    "WITH",
    "USING SCOPE",
    "GROUP BY",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "FOR VIEW",
    "FOR REFERENCE",
    "FOR UPDATE",
];

const WHERE_KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "IN", "NOT IN", "LIKE", "INCLUDES", "EXCLUDES",
];

const WHERE_FOLLOWERS: &[&str] = &["GROUP BY", "ORDER BY", "LIMIT", "OFFSET"];

const ORDER_BY_KEYWORDS: &[&str] = &["ASC", "DESC", "NULLS FIRST", "NULLS LAST", "LIMIT", "OFFSET"];

const GROUP_BY_KEYWORDS: &[&str] = &["ROLLUP", "CUBE", "HAVING", "ORDER BY", "LIMIT"];

const STATEMENT_KEYWORDS: &[&str] = &["SELECT", "FROM", "WHERE", "ORDER BY", "GROUP BY", "LIMIT"];

/// Completes read-query input.
pub fn complete_query(request: CompletionRequest<'_>, config: &QueryCompletionConfig) -> CompletionResult {
    let pos = clamp_cursor(request.doc, request.pos);
    let context = classify_query(request.doc, pos);
    if context.partial.is_empty() && !request.explicit {
        return CompletionResult::empty(pos);
    }

    let qualifier = context.qualifier.as_deref().unwrap_or("");
    let fields = move || config.fields.iter().map(move |f| field_completion(f, qualifier));

    let mut candidates = Candidates::default();
    match context.zone {
        QueryZone::Select => {
            candidates.extend(fields());
            candidates.words(FUNCTIONS, CompletionKind::Function);
            candidates.words(SELECT_KEYWORDS, CompletionKind::Keyword);
        }
        QueryZone::From => {
            candidates.extend(config.objects.iter().map(object_completion));
            candidates.words(FROM_KEYWORDS, CompletionKind::Keyword);
        }
        QueryZone::Where => {
            candidates.extend(fields());
            candidates.words(WHERE_KEYWORDS, CompletionKind::Operator);
            candidates.words(LITERALS, CompletionKind::Constant);
            candidates.words(DATE_LITERALS, CompletionKind::Date);
            candidates.words(DATE_TEMPLATES, CompletionKind::Date);
            candidates.words(WHERE_FOLLOWERS, CompletionKind::Keyword);
        }
        QueryZone::OrderBy => {
            candidates.extend(fields());
            candidates.words(ORDER_BY_KEYWORDS, CompletionKind::Keyword);
        }
        QueryZone::GroupBy => {
            candidates.extend(fields());
            candidates.words(GROUP_BY_KEYWORDS, CompletionKind::Keyword);
        }
        QueryZone::General => candidates.words(STATEMENT_KEYWORDS, CompletionKind::Keyword),
    }
    candidates.finish(context.from, pos, SQL_VALID_FOR)
}
