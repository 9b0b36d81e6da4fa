use cel_interpreter::Value;
use formula_kit::preview::limits::MAX_NESTING;
use formula_kit::preview::{
    EMPTY_EXPRESSION, EvaluationContext, PreviewValue, ValueType, create_environment, evaluate,
    evaluate_safe,
};
use formula_kit::schema::{FunctionDescriptor, FunctionParam};
use std::time::Duration;

fn function(name: &str, params: &[&str], body: &str) -> FunctionDescriptor {
    FunctionDescriptor {
        name: name.to_string(),
        params: params
            .iter()
            .map(|p| FunctionParam {
                name: p.to_string(),
                param_type: "number".to_string(),
                description: None,
            })
            .collect(),
        return_type: "number".to_string(),
        description: None,
        body: Some(body.to_string()),
    }
}

fn eval_plain(expr: &str) -> formula_kit::EvaluationResult {
    let env = create_environment(&[]);
    evaluate(&env, expr, &EvaluationContext::new(), true)
}

#[test]
fn test_addition_is_a_number() {
    let result = eval_plain("1 + 2");
    assert_eq!(result.value(), Some(&PreviewValue::Number(3.0)));
    assert_eq!(result.value_type(), Some(ValueType::Number));
}

#[test]
fn test_record_comparison() {
    let env = create_environment(&[]);
    let context = EvaluationContext::from_json(serde_json::json!({"record": {"Amount": 200}}));
    let result = evaluate(&env, "record.Amount > 100", &context, true);
    assert_eq!(result.value(), Some(&PreviewValue::Bool(true)));
    assert_eq!(result.value_type(), Some(ValueType::Bool));
}

#[test]
fn test_user_function_call() {
    let env = create_environment(&[function("double", &["x"], "x * 2")]);
    let result = evaluate(&env, "fn.double(5)", &EvaluationContext::new(), true);
    assert_eq!(result.value(), Some(&PreviewValue::Number(10.0)));
}

#[test]
fn test_user_function_with_several_params() {
    let env = create_environment(&[function("between", &["x", "lo", "hi"], "x >= lo && x <= hi")]);
    let result = evaluate(&env, "fn.between(5, 1, 10)", &EvaluationContext::new(), true);
    assert_eq!(result.value(), Some(&PreviewValue::Bool(true)));
}

#[test]
fn test_user_function_wrong_arity() {
    let env = create_environment(&[function("double", &["x"], "x * 2")]);
    let result = evaluate(&env, "fn.double(1, 2)", &EvaluationContext::new(), true);
    assert!(!result.is_success());
}

#[test]
fn test_user_functions_cannot_call_each_other() {
    let env = create_environment(&[
        function("double", &["x"], "x * 2"),
        function("quadruple", &["x"], "fn.double(fn.double(x))"),
    ]);
    let result = evaluate(&env, "fn.quadruple(3)", &EvaluationContext::new(), true);
    assert!(!result.is_success());
}

#[test]
fn test_user_function_does_not_hide_builtin() {
    let env = create_environment(&[function("size", &["x"], "x + 100")]);
    let context = EvaluationContext::new();
    assert_eq!(
        evaluate(&env, "fn.size(1)", &context, true).value(),
        Some(&PreviewValue::Number(101.0))
    );
    assert_eq!(
        evaluate(&env, "size('abc')", &context, true).value(),
        Some(&PreviewValue::Number(3.0))
    );
    assert_eq!(
        evaluate(&env, "[1, 2].size()", &context, true).value(),
        Some(&PreviewValue::Number(2.0))
    );
}

#[test]
fn test_function_named_like_macro_is_skipped() {
    let env = create_environment(&[function("map", &["x"], "x")]);
    assert!(env.functions().is_empty());
    let result = evaluate(&env, "[1, 2].map(x, x * 3)", &EvaluationContext::new(), true);
    assert_eq!(
        result.value(),
        Some(&PreviewValue::List(vec![PreviewValue::Number(3.0), PreviewValue::Number(6.0)]))
    );
}

#[test]
fn test_function_without_body_is_not_callable() {
    let mut no_body = function("later", &["x"], "");
    no_body.body = None;
    let env = create_environment(&[no_body, function("double", &["x"], "x * 2")]);
    assert_eq!(env.functions().len(), 1);
    let result = evaluate(&env, "fn.later(1)", &EvaluationContext::new(), true);
    assert!(!result.is_success());
}

#[test]
fn test_fn_not_bound_without_functions_flag() {
    let env = create_environment(&[function("double", &["x"], "x * 2")]);
    let result = evaluate(&env, "fn.double(5)", &EvaluationContext::new(), false);
    assert!(!result.is_success());
}

#[test]
fn test_syntax_error_fails() {
    let result = eval_plain("1 +");
    assert!(!result.is_success());
    assert!(!result.error().unwrap().is_empty());
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    let depth = 5000;
    let expr = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let result = eval_plain(&expr);
    assert!(!result.is_success());
    assert_eq!(result.position(), Some(MAX_NESTING));
    assert!(result.error().unwrap().contains("nesting"));

    let env = create_environment(&[function("deep", &["x"], &expr)]);
    assert!(!evaluate(&env, "fn.deep(1)", &EvaluationContext::new(), true).is_success());

    let chain = vec!["1"; 5000].join(" + ");
    assert!(!eval_plain(&chain).is_success());

    let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert_eq!(eval_plain(&shallow).value(), Some(&PreviewValue::Number(1.0)));
}

#[test]
fn test_empty_expression() {
    for expr in ["", "   ", "\n\t"] {
        let result = eval_plain(expr);
        assert_eq!(result.error(), Some(EMPTY_EXPRESSION));
        assert_eq!(result.position(), None);
    }
}

#[test]
fn test_integer_binding_stays_integral_until_normalized() {
    let env = create_environment(&[]);
    let context = EvaluationContext::new().with_binding("x", Value::Int(5));
    let result = evaluate(&env, "2 * x", &context, false);
    assert_eq!(result.value(), Some(&PreviewValue::Number(10.0)));
    assert_eq!(result.value_type(), Some(ValueType::Number));
}

#[test]
fn test_integer_division_truncates() {
    let result = eval_plain("7 / 2");
    assert_eq!(result.value(), Some(&PreviewValue::Number(3.0)));
}

#[test]
fn test_double_arithmetic() {
    let result = eval_plain("1.0 + 0.5");
    assert_eq!(result.value(), Some(&PreviewValue::Number(1.5)));
}

#[test]
fn test_huge_integer_becomes_number() {
    let result = eval_plain("9007199254740993");
    assert_eq!(result.value(), Some(&PreviewValue::Number(9007199254740993_i64 as f64)));
    assert_eq!(result.value_type(), Some(ValueType::Number));
}

#[test]
fn test_list_and_map_normalized() {
    let result = eval_plain("{'b': [1, 2], 'a': 'x'}");
    assert_eq!(result.value_type(), Some(ValueType::Map));
    assert_eq!(result.value().unwrap().to_string(), r#"{"a":"x","b":[1,2]}"#);
}

#[test]
fn test_type_tags() {
    let cases = [
        ("null", ValueType::Null),
        ("'abc'", ValueType::String),
        ("[1, 2].map(x, x * 2)", ValueType::List),
        ("b'abc'", ValueType::Unknown),
        ("size('abc') == 3", ValueType::Bool),
    ];
    for (expr, expected) in cases {
        assert_eq!(eval_plain(expr).value_type(), Some(expected), "{}", expr);
    }
}

#[test]
fn test_unknown_variable_is_runtime_error() {
    let result = eval_plain("missing + 1");
    assert!(result.error().unwrap().contains("missing"));

    let result = eval_plain("true || missing");
    assert_eq!(result.value(), Some(&PreviewValue::Bool(true)));
}

#[test]
fn test_context_from_json() {
    let context = EvaluationContext::from_json(serde_json::json!({
        "record": {"Status": "Open", "Amount": 50},
        "old": {"Status": "New"},
        "threshold": 40
    }));
    let env = create_environment(&[]);
    let result = evaluate(
        &env,
        "record.Status != old.Status && record.Amount > threshold",
        &context,
        true,
    );
    assert_eq!(result.value(), Some(&PreviewValue::Bool(true)));
}

#[test]
fn test_safe_with_generous_timeout_matches_evaluate() {
    let env = create_environment(&[function("double", &["x"], "x * 2")]);
    let context = EvaluationContext::new();
    for expr in ["fn.double(21)", "1 +", ""] {
        let direct = evaluate(&env, expr, &context, true);
        let safe = evaluate_safe(&env, expr, &context, Duration::from_secs(10));
        assert_eq!(direct, safe);
    }
}

#[test]
fn test_safe_reports_timeout() {
    let env = create_environment(&[]);
    let result = evaluate_safe(
        &env,
        "[1, 2, 3, 4, 5, 6, 7, 8].map(x, x * 2).size() > 0",
        &EvaluationContext::new(),
        Duration::ZERO,
    );
    let error = result.error().unwrap();
    assert!(error.starts_with("Evaluation timed out after "));
    assert!(error.ends_with("(limit: 0.000ms)"));
}

#[test]
fn test_timeout_message_keeps_sub_millisecond_limit() {
    let env = create_environment(&[]);
    let result = evaluate_safe(
        &env,
        "[1, 2, 3].map(x, x * 2)",
        &EvaluationContext::new(),
        Duration::from_micros(1),
    );
    let error = result.error().unwrap();
    assert!(error.ends_with("(limit: 0.001ms)"), "{}", error);
}

#[test]
fn test_result_json_shape() {
    let ok = serde_json::to_value(eval_plain("1 + 2")).unwrap();
    assert_eq!(ok, serde_json::json!({"success": true, "value": 3, "type": "number"}));

    let err = serde_json::to_value(eval_plain("")).unwrap();
    assert_eq!(err, serde_json::json!({"success": false, "error": "Empty expression"}));
}
