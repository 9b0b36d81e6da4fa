use crate::completion::{
    Candidates, CompletionKind, CompletionRequest, CompletionResult, QueryCompletionConfig,
    SQL_VALID_FOR, field_completion, object_completion,
};
use crate::context::{DmlZone, clamp_cursor, classify_dml};
use crate::highlight::dml::{FUNCTIONS, LITERALS};
use crate::highlight::query::DATE_LITERALS;

const STATEMENT_KEYWORDS: &[&str] = &["INSERT INTO", "UPDATE", "DELETE FROM", "UPSERT"];

const WHERE_KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "IN", "LIKE", "IS", "IS NOT", "BETWEEN",
];

/// Completes data-manipulation input.
pub fn complete_dml(request: CompletionRequest<'_>, config: &QueryCompletionConfig) -> CompletionResult {
    let pos = clamp_cursor(request.doc, request.pos);
    let context = classify_dml(request.doc, pos);
    if context.partial.is_empty() && !request.explicit {
        return CompletionResult::empty(pos);
    }

    let qualifier = context.qualifier.as_deref().unwrap_or("");
    let fields = move || config.fields.iter().map(move |f| field_completion(f, qualifier));
    let objects = move || config.objects.iter().map(object_completion);

    let mut candidates = Candidates::default();
    match context.zone {
        DmlZone::InsertObject => candidates.extend(objects()),
        DmlZone::InsertFields => candidates.extend(fields()),
        DmlZone::Values => {
            candidates.words(LITERALS, CompletionKind::Constant);
            candidates.words(&["DEFAULT"], CompletionKind::Keyword);
            candidates.words(FUNCTIONS, CompletionKind::Function);
            candidates.words(DATE_LITERALS, CompletionKind::Date);
        }
        DmlZone::UpdateObject => {
            candidates.extend(objects());
            candidates.words(&["SET"], CompletionKind::Keyword);
        }
        DmlZone::Set => {
            candidates.extend(fields());
            candidates.words(FUNCTIONS, CompletionKind::Function);
            candidates.words(LITERALS, CompletionKind::Constant);
            candidates.words(&["WHERE"], CompletionKind::Keyword);
        }
        DmlZone::DeleteObject => {
            candidates.extend(objects());
            candidates.words(&["WHERE"], CompletionKind::Keyword);
        }
        DmlZone::Where => {
            candidates.extend(fields());
            candidates.words(WHERE_KEYWORDS, CompletionKind::Operator);
            candidates.words(LITERALS, CompletionKind::Constant);
            candidates.words(DATE_LITERALS, CompletionKind::Date);
            candidates.words(&["RETURNING"], CompletionKind::Keyword);
        }
        DmlZone::General => candidates.words(STATEMENT_KEYWORDS, CompletionKind::Keyword),
    }
    candidates.finish(context.from, pos, SQL_VALID_FOR)
}
