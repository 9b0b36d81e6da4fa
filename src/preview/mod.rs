//! # Expression preview
//!
//! Evaluates expressions typed into the editor against sample data and
//! shapes the outcome for a preview panel.
//!
//! User-defined functions are reachable as `fn.<name>(...)`. An environment
//! is built once per function set with [`create_environment`] and reused for
//! every keystroke; when the function set changes, build a new one.
//!
//! ```
//! use formula_kit::preview::{create_environment, evaluate, EvaluationContext, ValueType};
//! use formula_kit::schema::{FunctionDescriptor, FunctionParam};
//!
//! let double = FunctionDescriptor {
//!     name: "double".into(),
//!     params: vec![FunctionParam { name: "x".into(), param_type: "number".into(), description: None }],
//!     body: Some("x * 2".into()),
//!     ..Default::default()
//! };
//! let env = create_environment(&[double]);
//! let result = evaluate(&env, "fn.double(5)", &EvaluationContext::new(), true);
//! assert_eq!(result.value_type(), Some(ValueType::Number));
//! ```

mod functions;
pub mod limits;
pub mod value;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use cel_interpreter::{Context, Program, Value};

use crate::schema::FunctionDescriptor;

pub use functions::{
    DispatchTable, NAMESPACE_BINDING, NAMESPACE_TYPE, Scope, UserFunction, namespace_object,
};
pub use limits::LimitError;
pub use value::{PreviewValue, ValueType, from_json, normalize};

/// Error reported for blank input; the evaluator is never invoked for it.
pub const EMPTY_EXPRESSION: &str = "Empty expression";

/// Reusable evaluation environment holding the user-function dispatch table.
///
/// Only the table lives here; each evaluation gets its own evaluator context
/// built from it, so the environment is `Send + Sync` and never mutated.
#[derive(Debug, Clone)]
pub struct CelEnvironment {
    table: DispatchTable,
}

impl CelEnvironment {
    pub fn functions(&self) -> &DispatchTable {
        &self.table
    }

    /// Whether a function set was supplied, making `fn` available.
    pub fn has_namespace(&self) -> bool {
        self.table.is_declared()
    }

    fn context(&self) -> Context<'static> {
        functions::build_context(Scope::TopLevel, &self.table)
    }
}

/// Builds an environment for a set of user-defined functions.
///
/// Unbound variables are dynamic. Functions lacking a name or body are
/// skipped; later duplicates of a name are ignored.
pub fn create_environment(functions: &[FunctionDescriptor]) -> CelEnvironment {
    let table = DispatchTable::from_descriptors(functions);
    debug!(
        "created expression environment with {} callable function(s)",
        table.len()
    );
    CelEnvironment { table }
}

/// Data an expression is evaluated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    pub record: Option<Value>,
    pub old: Option<Value>,
    pub user: Option<Value>,
    pub now: Option<Value>,
    pub extra: BTreeMap<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: impl Into<Value>) -> Self {
        self.record = Some(record.into());
        self
    }

    pub fn with_old(mut self, old: impl Into<Value>) -> Self {
        self.old = Some(old.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<Value>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_now(mut self, now: impl Into<Value>) -> Self {
        self.now = Some(now.into());
        self
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Reads a context from a JSON object. Keys other than `record`, `old`,
    /// `user` and `now` become extra bindings; non-objects yield an empty context.
    pub fn from_json(json: serde_json::Value) -> Self {
        let serde_json::Value::Object(entries) = json else {
            return Self::default();
        };

        let mut context = Self::default();
        for (key, value) in entries {
            let value = from_json(value);
            match key.as_str() {
                "record" => context.record = Some(value),
                "old" => context.old = Some(value),
                "user" => context.user = Some(value),
                "now" => context.now = Some(value),
                _ => {
                    context.extra.insert(key, value);
                }
            }
        }
        context
    }

    fn bind(&self, context: &mut Context) {
        for (key, value) in &self.extra {
            context.add_variable_from_value(key.as_str(), value.clone());
        }
        let reserved = [
            ("record", &self.record),
            ("old", &self.old),
            ("user", &self.user),
            ("now", &self.now),
        ];
        for (name, value) in reserved {
            if let Some(value) = value {
                context.add_variable_from_value(name, value.clone());
            }
        }
    }
}

/// Outcome of evaluating one expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Success {
        value: PreviewValue,
        value_type: ValueType,
    },
    Failure {
        error: String,
        /// Character offset in the expression, for caret placement. Only the
        /// structural limit check reports one.
        position: Option<usize>,
    },
}

impl EvaluationResult {
    fn success(value: PreviewValue) -> Self {
        EvaluationResult::Success {
            value_type: value.value_type(),
            value,
        }
    }

    fn failure(error: impl Into<String>, position: Option<usize>) -> Self {
        EvaluationResult::Failure {
            error: error.into(),
            position,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EvaluationResult::Success { .. })
    }

    pub fn value(&self) -> Option<&PreviewValue> {
        match self {
            EvaluationResult::Success { value, .. } => Some(value),
            EvaluationResult::Failure { .. } => None,
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            EvaluationResult::Success { value_type, .. } => Some(*value_type),
            EvaluationResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EvaluationResult::Success { .. } => None,
            EvaluationResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            EvaluationResult::Success { .. } => None,
            EvaluationResult::Failure { position, .. } => *position,
        }
    }
}

/// Serializes as `{success, value, type}` or `{success, error, position?}`.
impl Serialize for EvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EvaluationResult::Success { value, value_type } => {
                let mut state = serializer.serialize_struct("EvaluationResult", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
                state.serialize_field("type", value_type)?;
                state.end()
            }
            EvaluationResult::Failure { error, position } => {
                let fields = if position.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("EvaluationResult", fields)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                if let Some(position) = position {
                    state.serialize_field("position", position)?;
                }
                state.end()
            }
        }
    }
}

/// Evaluates `expression` against `context`.
///
/// With `has_functions`, `fn` is bound to the namespace object so user
/// functions can be called; without it `fn` is an ordinary unbound name.
pub fn evaluate(
    env: &CelEnvironment,
    expression: &str,
    context: &EvaluationContext,
    has_functions: bool,
) -> EvaluationResult {
    if expression.trim().is_empty() {
        return EvaluationResult::failure(EMPTY_EXPRESSION, None);
    }

    if let Err(e) = limits::check(expression) {
        debug!("expression rejected: {} (position {})", e, e.position());
        return EvaluationResult::failure(e.to_string(), Some(e.position()));
    }

    let program = match Program::compile(expression) {
        Ok(program) => program,
        Err(e) => {
            debug!("expression does not parse: {}", e);
            return EvaluationResult::failure(e.to_string(), None);
        }
    };

    let mut bindings = env.context();
    context.bind(&mut bindings);
    if has_functions && env.has_namespace() {
        bindings.add_variable_from_value(NAMESPACE_BINDING, namespace_object());
    }

    match program.execute(&bindings) {
        Ok(value) => EvaluationResult::success(normalize(&value)),
        Err(e) => {
            debug!("evaluation failed: {}", e);
            EvaluationResult::failure(e.to_string(), None)
        }
    }
}

/// Like [`evaluate`] with functions enabled, but reports a timeout when the
/// call took longer than `timeout`.
///
/// Evaluation is synchronous and cannot be interrupted: the check happens
/// after it finishes, and a result computed too slowly is discarded.
pub fn evaluate_safe(
    env: &CelEnvironment,
    expression: &str,
    context: &EvaluationContext,
    timeout: Duration,
) -> EvaluationResult {
    let started = Instant::now();
    let result = evaluate(env, expression, context, true);
    let elapsed = started.elapsed();

    if elapsed > timeout {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let limit_ms = timeout.as_secs_f64() * 1000.0;
        warn!(
            "expression exceeded time budget: {:.3}ms > {:.3}ms",
            elapsed_ms, limit_ms
        );
        return EvaluationResult::failure(
            format!(
                "Evaluation timed out after {:.3}ms (limit: {:.3}ms)",
                elapsed_ms, limit_ms
            ),
            None,
        );
    }
    result
}
