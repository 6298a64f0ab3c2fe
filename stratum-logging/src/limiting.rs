use std::fmt::{self, Debug, Display};

/// Truncates the formatted value to at most `limit` bytes when logged,
/// eg a very long generated SQL statement
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxLogLength<'a, T: ?Sized> {
    limit: Option<usize>,
    val: &'a T,
}

impl<'a, T: ?Sized> MaxLogLength<'a, T> {
    pub fn new(limit: Option<usize>, val: &'a T) -> Self {
        Self { limit, val }
    }

    fn write_limited(&self, f: &mut fmt::Formatter<'_>, fmt: String) -> fmt::Result {
        match self.limit {
            Some(limit) if fmt.len() > limit => {
                let mut end = limit;
                while !fmt.is_char_boundary(end) {
                    end -= 1;
                }
                write!(f, "{}...", &fmt[..end])
            }
            _ => f.write_str(&fmt),
        }
    }
}

impl<'a, T: Debug + ?Sized> Debug for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, format!("{:?}", self.val))
    }
}

impl<'a, T: Display + ?Sized> Display for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, format!("{}", self.val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_log_length_within_bounds() {
        let sql = "SELECT 1";
        let fmt = format!("{}", MaxLogLength::new(Some(50), sql));

        assert_eq!(fmt, "SELECT 1");
    }

    #[test]
    fn test_max_log_length_no_limit() {
        let val = vec![1, 2, 3, 4, 5];
        let fmt = format!("{:?}", MaxLogLength::new(None, &val));

        assert_eq!(fmt, "[1, 2, 3, 4, 5]");
    }

    #[test]
    fn test_max_log_length_truncated() {
        let sql = "SELECT \"id\" FROM \"orders\"";
        let fmt = format!("{}", MaxLogLength::new(Some(11), sql));

        assert_eq!(fmt, "SELECT \"id\"...");
    }

    #[test]
    fn test_max_log_length_truncated_on_char_boundary() {
        let val = "ab\u{e9}cd";
        let fmt = format!("{}", MaxLogLength::new(Some(3), val));

        assert_eq!(fmt, "ab...");
    }
}
