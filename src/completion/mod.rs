//! # Completion
//!
//! Builds candidate lists for the completion popup. Each builder asks its
//! context classifier where the cursor is, then concatenates candidates in
//! a fixed order: schema-derived names first, then the zone's static
//! vocabulary, then (for expressions) the reserved context variables.
//! Labels are unique within a result. The first occurrence wins unless a
//! later one carries a higher priority, which then takes its place.

pub mod dml;
pub mod expression;
pub mod query;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::{
    AuthoringContext, FieldDescriptor, FunctionDescriptor, ObjectDescriptor, ParamDescriptor,
};

pub use dml::complete_dml;
pub use expression::complete_expression;
pub use query::complete_query;

/// Characters the host may keep filtering on without asking again.
pub const EXPRESSION_VALID_FOR: &str = r"^[A-Za-z0-9_]*$";
pub const SQL_VALID_FOR: &str = r"^[A-Za-z0-9_.]*$";

/// Priority given to reserved context variables and parameters.
pub const CONTEXT_VARIABLE_PRIORITY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Keyword,
    Operator,
    Function,
    Variable,
    Parameter,
    Field,
    Object,
    Constant,
    Date,
}

/// One candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub label: String,
    /// Inserted instead of `label` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    pub kind: CompletionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl Completion {
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Completion {
            label: label.into(),
            insertion_text: None,
            detail: None,
            info: None,
            kind,
            priority: None,
        }
    }

    pub fn with_insertion_text(mut self, text: impl Into<String>) -> Self {
        self.insertion_text = Some(text.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets `info`, ignoring empty text.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        let info = info.into();
        if !info.is_empty() {
            self.info = Some(info);
        }
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Text that replaces the range `from..to`.
    pub fn apply_text(&self) -> &str {
        self.insertion_text.as_deref().unwrap_or(&self.label)
    }
}

/// Candidates plus the document range they replace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub from: usize,
    pub to: usize,
    pub options: Vec<Completion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<String>,
}

impl CompletionResult {
    /// Nothing to offer at `pos`.
    pub fn empty(pos: usize) -> Self {
        CompletionResult {
            from: pos,
            to: pos,
            options: Vec::new(),
            valid_for: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|c| c.label.as_str()).collect()
    }
}

/// The document, a byte offset into it, and whether the user asked for
/// completion explicitly instead of it firing while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub doc: &'a str,
    pub pos: usize,
    pub explicit: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(doc: &'a str, pos: usize) -> Self {
        CompletionRequest {
            doc,
            pos,
            explicit: false,
        }
    }

    /// Cursor at the end of `doc`.
    pub fn at_end(doc: &'a str) -> Self {
        Self::new(doc, doc.len())
    }

    pub fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExpressionCompletionConfig {
    pub fields: Vec<FieldDescriptor>,
    pub params: Vec<ParamDescriptor>,
    pub functions: Vec<FunctionDescriptor>,
    pub context: AuthoringContext,
}

/// Configuration for both SQL-like languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryCompletionConfig {
    pub objects: Vec<ObjectDescriptor>,
    pub fields: Vec<FieldDescriptor>,
}

/// Ordered candidate list that drops repeated labels.
#[derive(Debug, Default)]
pub(crate) struct Candidates {
    seen: HashMap<String, usize>,
    options: Vec<Completion>,
}

impl Candidates {
    pub fn push(&mut self, completion: Completion) {
        match self.seen.get(&completion.label) {
            Some(&index) => {
                let existing = &mut self.options[index];
                if completion.priority.unwrap_or(0) > existing.priority.unwrap_or(0) {
                    *existing = completion;
                }
            }
            None => {
                self.seen.insert(completion.label.clone(), self.options.len());
                self.options.push(completion);
            }
        }
    }

    pub fn extend(&mut self, completions: impl IntoIterator<Item = Completion>) {
        for completion in completions {
            self.push(completion);
        }
    }

    /// Adds every word of a static list.
    pub fn words(&mut self, words: &[&str], kind: CompletionKind) {
        self.extend(words.iter().map(|w| Completion::new(*w, kind)));
    }

    pub fn finish(self, from: usize, to: usize, valid_for: &str) -> CompletionResult {
        CompletionResult {
            from,
            to,
            options: self.options,
            valid_for: Some(valid_for.to_string()),
        }
    }
}

pub(crate) fn field_completion(field: &FieldDescriptor, qualifier: &str) -> Completion {
    let mut completion = Completion::new(
        format!("{}{}", qualifier, field.api_name),
        CompletionKind::Field,
    )
    .with_info(field.label.clone());
    if !field.field_type.is_empty() {
        completion = completion.with_detail(field.field_type.clone());
    }
    completion
}

pub(crate) fn object_completion(object: &ObjectDescriptor) -> Completion {
    Completion::new(object.api_name.clone(), CompletionKind::Object).with_info(object.label.clone())
}
