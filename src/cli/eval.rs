//! Evaluate an expression against a JSON context

use std::time::Duration;

use super::CliError;
use crate::preview::{EvaluationContext, EvaluationResult, create_environment, evaluate_safe};
use crate::schema::FunctionDescriptor;

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    pub expression: String,
    /// JSON object with `record`, `old`, `user`, `now` and extra bindings
    pub context: Option<String>,
    /// JSON array of function descriptors
    pub functions: Option<String>,
    pub timeout: Duration,
}

/// Evaluate an expression. Evaluation failures are part of the result;
/// only unreadable options are errors.
pub fn execute_eval(options: &EvalOptions) -> Result<EvaluationResult, CliError> {
    let context = match &options.context {
        Some(json) => EvaluationContext::from_json(serde_json::from_str(json)?),
        None => EvaluationContext::new(),
    };
    let functions: Vec<FunctionDescriptor> = match &options.functions {
        Some(json) => serde_json::from_str(json)?,
        None => Vec::new(),
    };

    let env = create_environment(&functions);
    Ok(evaluate_safe(&env, &options.expression, &context, options.timeout))
}
