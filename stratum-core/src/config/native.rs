use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named SQL statement exposed as a read-only collection.
///
/// Arguments are referenced in the sql as `{{name}}` and are inlined
/// as literals when the query is compiled.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NativeQueryInfo {
    pub sql: String,
    pub columns: IndexMap<String, NativeQueryColumnInfo>,
    #[serde(default)]
    pub arguments: IndexMap<String, NativeQueryColumnInfo>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct NativeQueryColumnInfo {
    pub r#type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// A segment of a native query's sql text
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NativeQueryPart {
    Text(String),
    Argument(String),
}

impl NativeQueryInfo {
    /// Splits the sql into literal text and `{{argument}}` placeholders.
    ///
    /// An unterminated `{{` is kept as text.
    pub fn parts(&self) -> Vec<NativeQueryPart> {
        let mut parts = vec![];
        let mut rest = self.sql.as_str();

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };

            if start > 0 {
                parts.push(NativeQueryPart::Text(rest[..start].to_string()));
            }

            let name = rest[start + 2..start + 2 + len].trim();
            parts.push(NativeQueryPart::Argument(name.to_string()));
            rest = &rest[start + 2 + len + 2..];
        }

        if !rest.is_empty() {
            parts.push(NativeQueryPart::Text(rest.to_string()));
        }

        parts
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn native(sql: &str) -> NativeQueryInfo {
        NativeQueryInfo {
            sql: sql.into(),
            columns: IndexMap::new(),
            arguments: IndexMap::new(),
            description: None,
        }
    }

    #[test]
    fn test_parts_no_arguments() {
        assert_eq!(
            native("SELECT 1").parts(),
            vec![NativeQueryPart::Text("SELECT 1".into())]
        );
    }

    #[test]
    fn test_parts_with_arguments() {
        assert_eq!(
            native("SELECT * FROM t WHERE a > {{min}} AND b = {{ name }}").parts(),
            vec![
                NativeQueryPart::Text("SELECT * FROM t WHERE a > ".into()),
                NativeQueryPart::Argument("min".into()),
                NativeQueryPart::Text(" AND b = ".into()),
                NativeQueryPart::Argument("name".into()),
            ]
        );
    }

    #[test]
    fn test_parts_unterminated_placeholder() {
        assert_eq!(
            native("{{a}} {{b").parts(),
            vec![
                NativeQueryPart::Argument("a".into()),
                NativeQueryPart::Text(" {{b".into()),
            ]
        );
    }
}
