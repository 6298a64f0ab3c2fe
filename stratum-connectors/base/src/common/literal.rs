use enum_as_inner::EnumAsInner;
use serde_json::Value;

/// A literal value to be inlined into the generated SQL
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum ScalarLiteral {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    List(Vec<ScalarLiteral>),
}

impl ScalarLiteral {
    /// Converts a json value from a request into a literal.
    ///
    /// Strings are kept as strings. Other primitives are converted from their
    /// text, preferring an integer over a float over a boolean. Arrays convert
    /// element-wise and objects are inlined as their json text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ScalarLiteral::Null,
            Value::String(s) => ScalarLiteral::String(s.clone()),
            Value::Array(items) => ScalarLiteral::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => ScalarLiteral::String(value.to_string()),
            Value::Number(_) | Value::Bool(_) => Self::from_text(value.to_string()),
        }
    }

    fn from_text(text: String) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            return ScalarLiteral::Integer(i);
        }

        if let Ok(f) = text.parse::<f64>() {
            return ScalarLiteral::Float(f);
        }

        match text.as_str() {
            "true" => ScalarLiteral::Boolean(true),
            "false" => ScalarLiteral::Boolean(false),
            _ => ScalarLiteral::String(text),
        }
    }
}
