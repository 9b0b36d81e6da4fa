use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use serde::{Serialize, Serializer};

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// An evaluation result shaped for display. Integers are folded into
/// ordinary numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PreviewValue>),
    Map(BTreeMap<String, PreviewValue>),

    /// Values with no natural display form (bytes, timestamps, durations,
    /// the function namespace), rendered as text
    Other(String),
}

/// Semantic type tag of a preview value.
///
/// `Int` marks an integer the normalization left unconverted; every integer
/// the evaluator produces is converted, so [`PreviewValue::value_type`] never
/// infers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Bool,
    Number,
    Int,
    String,
    List,
    Map,
    Unknown,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::Int => "int",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl PreviewValue {
    /// Infers the type tag from the value's runtime shape.
    pub fn value_type(&self) -> ValueType {
        match self {
            PreviewValue::Null => ValueType::Null,
            PreviewValue::Bool(_) => ValueType::Bool,
            PreviewValue::Number(_) => ValueType::Number,
            PreviewValue::String(_) => ValueType::String,
            PreviewValue::List(_) => ValueType::List,
            PreviewValue::Map(_) => ValueType::Map,
            PreviewValue::Other(_) => ValueType::Unknown,
        }
    }
}

/// Recursively converts an evaluator value into a preview value. Every
/// integer becomes an ordinary number; list order and map keys are preserved.
pub fn normalize(value: &Value) -> PreviewValue {
    match value {
        Value::Null => PreviewValue::Null,
        Value::Bool(b) => PreviewValue::Bool(*b),
        Value::Int(n) => PreviewValue::Number(*n as f64),
        Value::UInt(n) => PreviewValue::Number(*n as f64),
        Value::Float(n) => PreviewValue::Number(*n),
        Value::String(s) => PreviewValue::String(s.as_str().to_string()),
        Value::List(items) => PreviewValue::List(items.iter().map(normalize).collect()),
        Value::Map(map) => PreviewValue::Map(
            map.map
                .iter()
                .map(|(k, v)| (key_text(k), normalize(v)))
                .collect(),
        ),
        other => PreviewValue::Other(format!("{:?}", other)),
    }
}

fn key_text(key: &Key) -> String {
    match key {
        Key::Int(n) => n.to_string(),
        Key::Uint(n) => n.to_string(),
        Key::Bool(b) => b.to_string(),
        Key::String(s) => s.as_str().to_string(),
    }
}

/// Converts host JSON into an evaluator value. Integral numbers become
/// `int` (or `uint` above `i64::MAX`), the rest `double`.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(Arc::new(s)),
        serde_json::Value::Array(items) => {
            Value::List(Arc::new(items.into_iter().map(from_json).collect()))
        }
        serde_json::Value::Object(entries) => {
            let map: HashMap<Key, Value> = entries
                .into_iter()
                .map(|(k, v)| (Key::String(Arc::new(k)), from_json(v)))
                .collect();
            Value::Map(Map { map: Arc::new(map) })
        }
    }
}

impl Serialize for PreviewValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PreviewValue::Null => serializer.serialize_none(),
            PreviewValue::Bool(b) => serializer.serialize_bool(*b),
            PreviewValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            PreviewValue::String(s) | PreviewValue::Other(s) => serializer.serialize_str(s),
            PreviewValue::List(items) => items.serialize(serializer),
            PreviewValue::Map(entries) => entries.serialize(serializer),
        }
    }
}

impl fmt::Display for PreviewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
