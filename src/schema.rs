//! Schema snapshots supplied by the host application.
//!
//! These describe the current authoring context (which object is being
//! edited, which user functions exist) and are treated as read-only input.
//! Field names follow the host's JSON shape (`apiName`, `fieldType`, ...).

use serde::{Deserialize, Serialize};

/// A queryable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub api_name: String,
    #[serde(default)]
    pub label: String,
}

/// A field of the object being edited or queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub api_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub field_type: String,
}

/// A parameter of a user-defined function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A user-defined function of the expression language.
///
/// `body` is the function's expression source. Functions without a body are
/// still offered for completion but cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<FunctionParam>,
    #[serde(default)]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FunctionDescriptor {
    /// `name(a, b)`, the text inserted when the function is completed.
    pub fn call_skeleton(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// `(a: number, b: string) -> bool`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                if p.param_type.is_empty() {
                    p.name.clone()
                } else {
                    format!("{}: {}", p.name, p.param_type)
                }
            })
            .collect();
        let return_type = if self.return_type.is_empty() {
            "dyn"
        } else {
            self.return_type.as_str()
        };
        format!("({}) -> {}", params.join(", "), return_type)
    }
}

/// A parameter declared for the snippet being authored (function bodies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where an expression is being authored. Gates which reserved names are
/// offered for completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoringContext {
    /// Generic record context: `record`, `user`, `now`
    #[default]
    Record,
    /// Validation rules also see the previous record as `old`
    ValidationRule,
    /// Trigger conditions also see `old`
    WhenExpression,
    /// Function bodies see their declared parameters
    FunctionBody,
}

impl AuthoringContext {
    pub fn has_old_record(self) -> bool {
        matches!(
            self,
            AuthoringContext::ValidationRule | AuthoringContext::WhenExpression
        )
    }
}

/// Everything the host knows about the current authoring context, in one
/// deserializable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSnapshot {
    pub objects: Vec<ObjectDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    pub functions: Vec<FunctionDescriptor>,
    pub params: Vec<ParamDescriptor>,
    pub context: AuthoringContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_host_json() {
        let json = r#"{
            "fields": [{"apiName": "Amount", "label": "Amount", "fieldType": "currency"}],
            "functions": [{"name": "double", "params": [{"name": "x", "type": "number"}],
                           "returnType": "number", "body": "x * 2"}],
            "context": "validation_rule"
        }"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.fields[0].field_type, "currency");
        assert_eq!(snapshot.context, AuthoringContext::ValidationRule);
        assert_eq!(snapshot.functions[0].call_skeleton(), "double(x)");
        assert_eq!(snapshot.functions[0].signature(), "(x: number) -> number");
        assert!(snapshot.objects.is_empty());
    }
}
