use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::{clamp_cursor, is_word_char, word_start};
use crate::schema::AuthoringContext;

/// A reserved prefix and dot at the end of the line, then the partial member name.
static MEMBER_ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_.])(record|old|user|fn)\.([A-Za-z0-9_]*)$")
        .expect("valid member pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionZone {
    /// After `record.`
    RecordField,
    /// After `old.`, only where a previous record exists
    OldField,
    /// After `user.`
    UserField,
    /// After `fn.`
    FunctionNamespace,
    /// A bare word, or nothing at an explicit request
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionContext {
    pub zone: ExpressionZone,
    /// Start of the replaced range; after a prefix, just past the dot
    pub from: usize,
    pub partial: String,
}

/// Classifies the cursor from the text before it on the current line.
///
/// Returns `None` when nothing is being typed and completion was not
/// explicitly requested.
pub fn classify_expression(
    doc: &str,
    pos: usize,
    explicit: bool,
    authoring: AuthoringContext,
) -> Option<ExpressionContext> {
    let pos = clamp_cursor(doc, pos);
    let line_start = doc[..pos].rfind('\n').map_or(0, |i| i + 1);
    let before = &doc[line_start..pos];

    if let Some(caps) = MEMBER_ACCESS.captures(before) {
        let zone = match &caps[1] {
            "record" => Some(ExpressionZone::RecordField),
            "old" if authoring.has_old_record() => Some(ExpressionZone::OldField),
            "user" => Some(ExpressionZone::UserField),
            "fn" => Some(ExpressionZone::FunctionNamespace),
            _ => None,
        };
        if let Some(zone) = zone {
            let partial = caps[2].to_string();
            trace!("expression cursor {} in {:?} ({:?})", pos, zone, partial);
            return Some(ExpressionContext {
                zone,
                from: pos - partial.len(),
                partial,
            });
        }
    }

    let from = word_start(doc, pos, is_word_char).max(line_start);
    if from == pos && !explicit {
        return None;
    }
    trace!("expression cursor {} in general zone", pos);
    Some(ExpressionContext {
        zone: ExpressionZone::General,
        from,
        partial: doc[from..pos].to_string(),
    })
}
