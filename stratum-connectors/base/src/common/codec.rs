use serde_json::{Map, Number, Value};
use stratum_core::data::DataValue;

/// Converts a cell decoded by the driver into its protocol value.
///
/// Strings which look like json documents (starting with `[` or `{`) are
/// parsed, other strings and documents which fail to parse are kept as text.
pub fn to_protocol_value(value: DataValue) -> Value {
    match value {
        DataValue::Null => Value::Null,
        DataValue::Utf8String(s) => parse_json_string(s),
        DataValue::Char(c) => Value::String(c.to_string()),
        DataValue::Binary(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
        DataValue::Boolean(b) => Value::Bool(b),
        DataValue::Int8(i) => i.into(),
        DataValue::UInt8(i) => i.into(),
        DataValue::Int16(i) => i.into(),
        DataValue::UInt16(i) => i.into(),
        DataValue::Int32(i) => i.into(),
        DataValue::UInt32(i) => i.into(),
        DataValue::Int64(i) => i.into(),
        DataValue::UInt64(i) => i.into(),
        DataValue::Float32(f) => float_value(f as f64),
        DataValue::Float64(f) => float_value(f),
        DataValue::Decimal(d) => Value::String(d.to_string()),
        DataValue::JSON(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
        DataValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        DataValue::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
        DataValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        DataValue::DateTimeWithTZ(dt) => Value::String(dt.to_rfc3339()),
        DataValue::Uuid(u) => Value::String(u.to_string()),
        DataValue::List(items) => Value::Array(items.into_iter().map(to_protocol_value).collect()),
        DataValue::Map(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (map_key(k), to_protocol_value(v)))
                .collect::<Map<_, _>>(),
        ),
    }
}

fn parse_json_string(s: String) -> Value {
    if s.starts_with('[') || s.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str(&s) {
            return parsed;
        }
    }

    Value::String(s)
}

/// Json has no representation for NaN or the infinities
fn float_value(f: f64) -> Value {
    match Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None => Value::String(f.to_string()),
    }
}

fn map_key(key: DataValue) -> String {
    match to_protocol_value(key) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
