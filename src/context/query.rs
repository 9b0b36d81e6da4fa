use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::{ClauseContext, clamp_cursor, clause_pattern, rightmost_clause};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryZone {
    Select,
    From,
    Where,
    OrderBy,
    GroupBy,
    General,
}

static CLAUSES: Lazy<Vec<(Regex, QueryZone)>> = Lazy::new(|| {
    [
        ("SELECT", QueryZone::Select),
        ("FROM", QueryZone::From),
        ("WHERE", QueryZone::Where),
        ("ORDER BY", QueryZone::OrderBy),
        ("GROUP BY", QueryZone::GroupBy),
    ]
    .into_iter()
    .map(|(keyword, zone)| (clause_pattern(keyword), zone))
    .collect()
});

/// Classifies the cursor by the clause keyword appearing last in the text
/// before it. Subqueries and multiple statements are not understood.
pub fn classify_query(doc: &str, pos: usize) -> ClauseContext<QueryZone> {
    let pos = clamp_cursor(doc, pos);
    let text = &doc[..pos];
    let zone = rightmost_clause(text, &CLAUSES).map_or(QueryZone::General, |(zone, _)| zone);
    trace!("query cursor {} in {:?}", pos, zone);
    ClauseContext::new(zone, doc, pos)
}
