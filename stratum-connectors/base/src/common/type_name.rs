/// Vendor type text split into its name and top-level arguments.
///
/// `NUMBER(38, 0)` parses to `NUMBER` with `["38", "0"]`,
/// `ARRAY<STRUCT<a INT64>>` to `ARRAY` with `["STRUCT<a INT64>"]` and
/// `timestamp(3) with time zone` to `TIMESTAMP WITH TIME ZONE` with `["3"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// Uppercased, whitespace collapsed
    pub name: String,
    /// Arguments with their original casing, trimmed
    pub args: Vec<String>,
}

impl TypeName {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let mut name = String::new();
        let mut args = vec![];
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if (c == '(' || c == '<') && args.is_empty() {
                let close = matching_close(text, idx);
                args = split_top_level(&text[idx + 1..close], ',');
                while chars.peek().map_or(false, |(i, _)| *i <= close) {
                    chars.next();
                }
                continue;
            }

            name.push(c);
        }

        Self {
            name: collapse_whitespace(&name).to_uppercase(),
            args,
        }
    }

    /// Parses the argument at `idx` as an integer, eg a precision
    pub fn arg_u32(&self, idx: usize) -> Option<u32> {
        self.args.get(idx).and_then(|a| a.trim().parse().ok())
    }

    /// The precision and scale arguments, defaulting each when absent
    pub fn precision_scale(&self, default_precision: u32, default_scale: u32) -> (u32, u32) {
        match (self.arg_u32(0), self.arg_u32(1)) {
            (Some(p), Some(s)) => (p, s),
            (Some(p), None) => (p, 0),
            _ => (default_precision, default_scale),
        }
    }
}

/// Splits a struct field definition, `a INT64` or `a: INT`, into its name and
/// type text
pub fn split_field(text: &str) -> (String, String) {
    let text = text.trim();
    let end = text
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(text.len());
    let name = text[..end].trim_matches('`').trim_matches('"').to_string();
    let rest = text[end..].trim_start().trim_start_matches(':').trim();

    (name, rest.to_string())
}

/// Replaces anything but ascii alphanumerics with single underscores,
/// eg `NUMBER(38,0)` becomes `NUMBER_38_0`
pub fn sanitize_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }

    out.trim_end_matches('_').to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of the bracket closing the one at `open`, or the end of the text
fn matching_close(text: &str, open: usize) -> usize {
    let mut depth = 0;

    for (idx, c) in text[open..].char_indices() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => {
                depth -= 1;
                if depth == 0 {
                    return open + idx;
                }
            }
            _ => {}
        }
    }

    text.len()
}

fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = vec![];
    let mut depth = 0;
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_bare_type() {
        assert_eq!(
            TypeName::parse(" varchar "),
            TypeName {
                name: "VARCHAR".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_parse_precision_scale() {
        let ty = TypeName::parse("NUMBER(38, 0)");

        assert_eq!(ty.name, "NUMBER");
        assert_eq!(ty.args, vec!["38".to_string(), "0".to_string()]);
        assert_eq!(ty.precision_scale(10, 0), (38, 0));
    }

    #[test]
    fn test_precision_scale_defaults() {
        assert_eq!(TypeName::parse("DECIMAL").precision_scale(38, 9), (38, 9));
        assert_eq!(TypeName::parse("DECIMAL(5)").precision_scale(38, 9), (5, 0));
    }

    #[test]
    fn test_parse_trailing_words() {
        let ty = TypeName::parse("timestamp(3)   with time zone");

        assert_eq!(ty.name, "TIMESTAMP WITH TIME ZONE");
        assert_eq!(ty.args, vec!["3".to_string()]);
    }

    #[test]
    fn test_parse_nested_generic() {
        let ty = TypeName::parse("ARRAY<STRUCT<a INT64, b NUMERIC(10, 2)>>");

        assert_eq!(ty.name, "ARRAY");
        assert_eq!(ty.args, vec!["STRUCT<a INT64, b NUMERIC(10, 2)>".to_string()]);

        let inner = TypeName::parse(&ty.args[0]);
        assert_eq!(inner.name, "STRUCT");
        assert_eq!(
            inner.args,
            vec!["a INT64".to_string(), "b NUMERIC(10, 2)".to_string()]
        );
    }

    #[test]
    fn test_parse_map() {
        let ty = TypeName::parse("map<string,array<int>>");

        assert_eq!(ty.name, "MAP");
        assert_eq!(
            ty.args,
            vec!["string".to_string(), "array<int>".to_string()]
        );
    }

    #[test]
    fn test_split_field() {
        assert_eq!(split_field("a INT64"), ("a".into(), "INT64".into()));
        assert_eq!(split_field("name: STRING"), ("name".into(), "STRING".into()));
        assert_eq!(
            split_field(" b  NUMERIC(10, 2) "),
            ("b".into(), "NUMERIC(10, 2)".into())
        );
    }

    #[test]
    fn test_sanitize_type_name() {
        assert_eq!(sanitize_type_name("NUMBER(38,0)"), "NUMBER_38_0");
        assert_eq!(sanitize_type_name("ARRAY<INT64>"), "ARRAY_INT64");
        assert_eq!(
            sanitize_type_name("STRUCT<a INT64, b STRING>"),
            "STRUCT_a_INT64_b_STRING"
        );
        assert_eq!(
            sanitize_type_name("TIMESTAMP WITH TIME ZONE"),
            "TIMESTAMP_WITH_TIME_ZONE"
        );
    }
}
