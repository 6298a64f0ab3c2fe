//! Error handling for the connector.
//!
//! `anyhow` is the error currency throughout. Conditions the caller needs to
//! tell apart are typed errors which travel inside `anyhow::Error` and are
//! recovered with `downcast_ref`.

use std::fmt::Display;

pub use anyhow::{anyhow, bail, ensure, Context, Error, Result};

/// The request uses a construct which the query compiler does not support.
///
/// Raised deterministically at compile time, before any SQL is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotSupported {
    reason: String,
}

impl NotSupported {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for NotSupported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Not supported: {}", self.reason)
    }
}

impl std::error::Error for NotSupported {}

/// The request references something which does not exist in the configuration
/// (an unknown collection, column, variable or argument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRequest {
    reason: String,
}

impl InvalidRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for InvalidRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid request: {}", self.reason)
    }
}

impl std::error::Error for InvalidRequest {}

/// Returns early with a [`NotSupported`] error
#[macro_export]
macro_rules! not_supported {
    ($($arg:tt)*) => {
        return Err($crate::err::Error::new($crate::err::NotSupported::new(format!($($arg)*))))
    };
}

/// Returns early with an [`InvalidRequest`] error
#[macro_export]
macro_rules! invalid_request {
    ($($arg:tt)*) => {
        return Err($crate::err::Error::new($crate::err::InvalidRequest::new(format!($($arg)*))))
    };
}

/// Whether the error (or anything in its context chain) is a [`NotSupported`]
pub fn is_not_supported(err: &Error) -> bool {
    err.chain().any(|e| e.downcast_ref::<NotSupported>().is_some())
}

/// Whether the error (or anything in its context chain) is an [`InvalidRequest`]
pub fn is_invalid_request(err: &Error) -> bool {
    err.chain().any(|e| e.downcast_ref::<InvalidRequest>().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_not_supported() -> Result<()> {
        crate::not_supported!("relationship field '{}'", "author");
    }

    fn fails_invalid() -> Result<()> {
        crate::invalid_request!("unknown column '{}'", "foo");
    }

    #[test]
    fn test_not_supported_macro() {
        let err = fails_not_supported().unwrap_err();

        assert!(is_not_supported(&err));
        assert!(!is_invalid_request(&err));
        assert_eq!(err.to_string(), "Not supported: relationship field 'author'");
        assert_eq!(
            err.downcast_ref::<NotSupported>().unwrap().reason(),
            "relationship field 'author'"
        );
    }

    #[test]
    fn test_invalid_request_macro() {
        let err = fails_invalid().unwrap_err();

        assert!(is_invalid_request(&err));
        assert!(!is_not_supported(&err));
        assert_eq!(err.to_string(), "Invalid request: unknown column 'foo'");
    }

    #[test]
    fn test_typed_error_survives_context() {
        let err = fails_not_supported()
            .context("Failed to compile query")
            .unwrap_err();

        assert!(is_not_supported(&err));
    }
}
