use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::{ClauseContext, clamp_cursor, clause_pattern, rightmost_clause};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmlZone {
    /// `INSERT INTO <cursor>`
    InsertObject,
    /// `INSERT INTO Account (<cursor>`
    InsertFields,
    Values,
    UpdateObject,
    Set,
    DeleteObject,
    Where,
    General,
}

static CLAUSES: Lazy<Vec<(Regex, DmlZone)>> = Lazy::new(|| {
    [
        ("INSERT INTO", DmlZone::InsertObject),
        ("VALUES", DmlZone::Values),
        ("UPDATE", DmlZone::UpdateObject),
        ("SET", DmlZone::Set),
        ("DELETE FROM", DmlZone::DeleteObject),
        ("WHERE", DmlZone::Where),
    ]
    .into_iter()
    .map(|(keyword, zone)| (clause_pattern(keyword), zone))
    .collect()
});

/// Object name already typed and the field list opened.
static FIELD_LIST_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_]*\s*\(").expect("valid field list pattern"));

/// Classifies the cursor by the clause keyword appearing last in the text
/// before it. Nested parentheses and multiple statements are not understood.
pub fn classify_dml(doc: &str, pos: usize) -> ClauseContext<DmlZone> {
    let pos = clamp_cursor(doc, pos);
    let text = &doc[..pos];
    let zone = match rightmost_clause(text, &CLAUSES) {
        Some((DmlZone::InsertObject, end)) if FIELD_LIST_OPEN.is_match(&text[end..]) => {
            DmlZone::InsertFields
        }
        Some((zone, _)) => zone,
        None => DmlZone::General,
    };
    trace!("dml cursor {} in {:?}", pos, zone);
    ClauseContext::new(zone, doc, pos)
}
