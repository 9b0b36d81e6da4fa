//! Print highlight spans for a snippet

use serde::Serialize;

use super::CliError;
use crate::highlight::{Category, Language, highlight_line};

/// Options for the highlight command
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    pub language: Language,
    pub input: String,
}

/// One token with its text, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedToken {
    pub start: usize,
    pub end: usize,
    pub category: Category,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedLine {
    pub line: usize,
    pub tokens: Vec<HighlightedToken>,
}

/// Tokenize every line of the input, carrying state across lines.
pub fn execute_highlight(options: &HighlightOptions) -> Result<Vec<HighlightedLine>, CliError> {
    let tokenizer = options.language.tokenizer();
    let mut state = tokenizer.start_state();

    let lines = options
        .input
        .lines()
        .enumerate()
        .map(|(index, line)| HighlightedLine {
            line: index + 1,
            tokens: highlight_line(tokenizer, line, &mut state)
                .into_iter()
                .map(|span| HighlightedToken {
                    start: span.start,
                    end: span.end,
                    category: span.category,
                    text: line[span.start..span.end].to_string(),
                })
                .collect(),
        })
        .collect();
    Ok(lines)
}
