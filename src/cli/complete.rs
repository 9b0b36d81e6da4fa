//! Compute completions at a cursor

use super::CliError;
use crate::completion::{
    CompletionRequest, CompletionResult, ExpressionCompletionConfig, QueryCompletionConfig,
    complete_dml, complete_expression, complete_query,
};
use crate::highlight::Language;
use crate::schema::SchemaSnapshot;

/// Options for the complete command
#[derive(Debug, Clone)]
pub struct CompleteOptions {
    pub language: Language,
    pub input: String,
    /// Byte offset; defaults to the end of the input
    pub cursor: Option<usize>,
    pub explicit: bool,
    pub schema: SchemaSnapshot,
}

pub fn execute_complete(options: &CompleteOptions) -> Result<CompletionResult, CliError> {
    let len = options.input.len();
    let cursor = options.cursor.unwrap_or(len);
    if cursor > len {
        return Err(CliError::CursorOutOfRange { cursor, len });
    }

    let mut request = CompletionRequest::new(&options.input, cursor);
    request.explicit = options.explicit;

    let schema = &options.schema;
    let result = match options.language {
        Language::Expression => {
            let config = ExpressionCompletionConfig {
                fields: schema.fields.clone(),
                params: schema.params.clone(),
                functions: schema.functions.clone(),
                context: schema.context,
            };
            complete_expression(request, &config)
        }
        Language::Query | Language::Dml => {
            let config = QueryCompletionConfig {
                objects: schema.objects.clone(),
                fields: schema.fields.clone(),
            };
            if options.language == Language::Query {
                complete_query(request, &config)
            } else {
                complete_dml(request, &config)
            }
        }
    };
    Ok(result)
}
