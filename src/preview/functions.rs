//! Dispatch table for user-defined functions.
//!
//! Each user function is registered with the evaluator under its own name and
//! only answers calls whose receiver is the `fn` namespace object, so
//! `fn.double(5)` dispatches to the function named `double`. A call evaluates
//! the function body in a fresh, independent context.

use std::collections::BTreeMap;
use std::sync::Arc;

use cel_interpreter::extractors::Arguments;
use cel_interpreter::{Context, FunctionContext, Program, ResolveResult, Value};
use log::{debug, warn};

use super::limits;
use crate::schema::FunctionDescriptor;

/// Nominal type of the namespace object user functions are attached to.
pub const NAMESPACE_TYPE: &str = "CelFunctions";

/// Variable through which expressions reach user functions.
pub const NAMESPACE_BINDING: &str = "fn";

/// Built-ins that take unevaluated arguments. A user function cannot share
/// one of these names, since calls to it could not fall through to the macro.
const BUILTIN_MACROS: &[&str] = &["has", "all", "exists", "exists_one", "map", "filter"];

/// Scope a context is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A preview expression; user functions are registered.
    TopLevel,
    /// The body of a user function. Nothing is registered and no namespace
    /// binding exists, so a user function cannot call another user function
    /// or itself.
    FunctionBody,
}

/// The value bound to `fn`.
pub fn namespace_object() -> Value {
    Value::Function(Arc::new(NAMESPACE_TYPE.to_string()), None)
}

fn is_namespace(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Function(name, None)) if name.as_str() == NAMESPACE_TYPE)
}

/// One callable user function: declared parameter names plus body source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl UserFunction {
    /// Returns `None` for descriptors missing a name or a body.
    fn from_descriptor(descriptor: &FunctionDescriptor) -> Option<Self> {
        let name = descriptor.name.trim();
        let body = descriptor.body.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || body.is_empty() {
            return None;
        }
        Some(UserFunction {
            name: name.to_string(),
            params: descriptor.params.iter().map(|p| p.name.clone()).collect(),
            body: body.to_string(),
        })
    }

    /// Binds the arguments positionally to the declared parameter names and
    /// evaluates the body.
    fn invoke(&self, ftx: &FunctionContext, args: &[Value]) -> ResolveResult {
        if args.len() != self.params.len() {
            return Err(ftx.error(format!(
                "expected {} argument(s), got {}",
                self.params.len(),
                args.len()
            )));
        }
        limits::check(&self.body).map_err(|e| ftx.error(e))?;
        let program = Program::compile(&self.body).map_err(|e| ftx.error(e))?;

        let mut context = build_context(Scope::FunctionBody, &DispatchTable::default());
        for (name, value) in self.params.iter().zip(args) {
            context.add_variable_from_value(name.as_str(), value.clone());
        }
        program.execute(&context)
    }
}

/// Function name to implementation. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    functions: BTreeMap<String, Arc<UserFunction>>,
    /// Whether the descriptor list was non-empty, even if nothing was callable
    declared: bool,
}

impl DispatchTable {
    pub fn from_descriptors(descriptors: &[FunctionDescriptor]) -> Self {
        let mut functions = BTreeMap::new();
        for descriptor in descriptors {
            let Some(function) = UserFunction::from_descriptor(descriptor) else {
                debug!(
                    "skipping function '{}': missing name or body",
                    descriptor.name
                );
                continue;
            };
            if BUILTIN_MACROS.contains(&function.name.as_str()) {
                warn!("function '{}' would hide a built-in macro, ignored", function.name);
                continue;
            }
            if functions.contains_key(&function.name) {
                warn!("duplicate function '{}' ignored", function.name);
                continue;
            }
            functions.insert(function.name.clone(), Arc::new(function));
        }
        DispatchTable {
            functions,
            declared: !descriptors.is_empty(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UserFunction> {
        self.functions.get(name).map(Arc::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Whether a function set was supplied, which makes the namespace available.
    pub fn is_declared(&self) -> bool {
        self.declared
    }
}

/// Builds an evaluator context for a scope, with the standard built-ins.
/// Unbound variables stay unchecked until evaluation reads them.
pub(crate) fn build_context(scope: Scope, table: &DispatchTable) -> Context<'static> {
    let mut context = Context::default();
    if scope == Scope::FunctionBody {
        return context;
    }

    for (name, function) in &table.functions {
        let function = Arc::clone(function);
        context.add_function(
            name.as_str(),
            move |ftx: &FunctionContext, Arguments(args): Arguments| -> ResolveResult {
                if is_namespace(ftx.this.as_ref()) {
                    function.invoke(ftx, &args)
                } else {
                    call_builtin(ftx, &args)
                }
            },
        );
        debug!("registered {}.{}", NAMESPACE_BINDING, name);
    }
    context
}

/// Re-issues a call that did not go through `fn` against a plain context, so
/// a user function never hides the built-in of the same name.
fn call_builtin(ftx: &FunctionContext, args: &[Value]) -> ResolveResult {
    let mut context = Context::default();
    let mut params = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let param = format!("__arg{}", i);
        context.add_variable_from_value(param.as_str(), arg.clone());
        params.push(param);
    }

    let call = format!("{}({})", ftx.name, params.join(", "));
    let source = match &ftx.this {
        Some(this) => {
            context.add_variable_from_value("__this", this.clone());
            format!("__this.{}", call)
        }
        None => call,
    };
    let program = Program::compile(&source).map_err(|e| ftx.error(e))?;
    program.execute(&context)
}
