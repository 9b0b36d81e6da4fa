pub mod cli;
pub mod completion;
pub mod context;
pub mod highlight;
pub mod preview;
pub mod schema;

pub use completion::{
    Completion, CompletionKind, CompletionRequest, CompletionResult, ExpressionCompletionConfig,
    QueryCompletionConfig, complete_dml, complete_expression, complete_query,
};
pub use highlight::{
    Category, DmlTokenizer, ExpressionTokenizer, Language, QueryTokenizer, Span, Tokenizer,
    TokenizerState, highlight_document, highlight_line,
};
pub use preview::{
    CelEnvironment, EvaluationContext, EvaluationResult, PreviewValue, ValueType,
    create_environment, evaluate, evaluate_safe,
};
pub use schema::{
    AuthoringContext, FieldDescriptor, FunctionDescriptor, FunctionParam, ObjectDescriptor,
    ParamDescriptor, SchemaSnapshot,
};
