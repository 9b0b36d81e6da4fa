use crate::completion::{
    CONTEXT_VARIABLE_PRIORITY, Candidates, Completion, CompletionKind, CompletionRequest,
    CompletionResult, EXPRESSION_VALID_FOR, ExpressionCompletionConfig, field_completion,
};
use crate::context::{ExpressionZone, clamp_cursor, classify_expression};
use crate::highlight::expression::{FUNCTIONS, KEYWORDS, LITERALS, NAMESPACE};
use crate::schema::AuthoringContext;

/// Attributes of the running user, offered after `user.`.
pub const USER_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "Email",
    "Username",
    "FirstName",
    "LastName",
    "ProfileId",
    "RoleId",
];

/// Completes expression-language input.
pub fn complete_expression(
    request: CompletionRequest<'_>,
    config: &ExpressionCompletionConfig,
) -> CompletionResult {
    let pos = clamp_cursor(request.doc, request.pos);
    let Some(context) = classify_expression(request.doc, pos, request.explicit, config.context)
    else {
        return CompletionResult::empty(pos);
    };

    let mut candidates = Candidates::default();
    match context.zone {
        ExpressionZone::RecordField | ExpressionZone::OldField => {
            candidates.extend(config.fields.iter().map(|f| field_completion(f, "")));
        }
        ExpressionZone::UserField => candidates.words(USER_FIELDS, CompletionKind::Field),
        ExpressionZone::FunctionNamespace => {
            candidates.extend(
                config
                    .functions
                    .iter()
                    .filter(|f| !f.name.is_empty())
                    .map(|f| {
                        Completion::new(f.name.clone(), CompletionKind::Function)
                            .with_insertion_text(f.call_skeleton())
                            .with_detail(f.signature())
                            .with_info(f.description.clone().unwrap_or_default())
                    }),
            );
        }
        ExpressionZone::General => {
            candidates.words(LITERALS, CompletionKind::Constant);
            candidates.words(KEYWORDS, CompletionKind::Keyword);
            candidates.extend(
                FUNCTIONS
                    .iter()
                    .map(|f| Completion::new(*f, CompletionKind::Function).with_detail("built-in")),
            );
            candidates.extend(context_variables(config));
        }
    }
    candidates.finish(context.from, pos, EXPRESSION_VALID_FOR)
}

/// Reserved names visible in the authoring context, ranked above the rest.
fn context_variables(config: &ExpressionCompletionConfig) -> Vec<Completion> {
    let variable = |name: &str, detail: &str| {
        Completion::new(name, CompletionKind::Variable)
            .with_detail(detail)
            .with_priority(CONTEXT_VARIABLE_PRIORITY)
    };

    let mut variables = vec![variable("record", "current record")];
    if config.context.has_old_record() {
        variables.push(variable("old", "record before the change"));
    }
    variables.push(variable("user", "running user"));
    variables.push(variable("now", "current timestamp"));
    if !config.functions.is_empty() {
        variables.push(variable(NAMESPACE, "user-defined functions"));
    }
    if config.context == AuthoringContext::FunctionBody {
        variables.extend(config.params.iter().map(|p| {
            Completion::new(p.name.clone(), CompletionKind::Parameter)
                .with_detail(p.param_type.clone())
                .with_info(p.description.clone().unwrap_or_default())
                .with_priority(CONTEXT_VARIABLE_PRIORITY)
        }));
    }
    variables
}
