//! Centralized error handling for quickfetch

use std::io;
use thiserror::Error;

/// Custom error type for quickfetch operations
#[derive(Error, Debug)]
pub enum QuickfetchError {
    /// I/O errors (file reading, command execution)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors produced while serializing or reading JSON documents
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("usage: {key} {usage}")]
    MissingValue { key: String, usage: String },

    #[error("invalid value for {key}: `{value}` (expected {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("couldn't find config: {0}")]
    ConfigNotFound(String),

    #[error("failed to parse JSON config file `{path}` at pos {offset}: {message}")]
    ConfigSyntax {
        path: String,
        offset: usize,
        message: String,
    },

    #[error("config file exists in `{0}`, use `--gen-config-force` to overwrite")]
    ConfigExists(String),

    /// System detection errors, displayed verbatim on the module line
    #[error("{0}")]
    Detection(String),

    /// Parsing errors (invalid data format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl QuickfetchError {
    /// Process exit status for errors that terminate the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            QuickfetchError::UnknownOption(_) => 2,
            QuickfetchError::MissingValue { .. } => 3,
            QuickfetchError::InvalidValue { .. } => 4,
            QuickfetchError::ConfigNotFound(_) => 5,
            QuickfetchError::ConfigSyntax { .. } => 6,
            QuickfetchError::ConfigExists(_) => 7,
            _ => 1,
        }
    }

    pub(crate) fn missing(key: &str, usage: &str) -> Self {
        QuickfetchError::MissingValue {
            key: key.to_string(),
            usage: usage.to_string(),
        }
    }

    pub(crate) fn invalid(key: &str, value: &str, expected: &str) -> Self {
        QuickfetchError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Type alias for Results in quickfetch
pub type Result<T> = std::result::Result<T, QuickfetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_have_distinct_nonzero_codes() {
        let codes = [
            QuickfetchError::UnknownOption("--x".into()).exit_code(),
            QuickfetchError::missing("--x", "<str>").exit_code(),
            QuickfetchError::invalid("--x", "y", "z").exit_code(),
            QuickfetchError::ConfigNotFound("a".into()).exit_code(),
            QuickfetchError::ConfigSyntax {
                path: "a".into(),
                offset: 0,
                message: "m".into(),
            }
            .exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn detection_errors_display_verbatim() {
        let err = QuickfetchError::Detection("permission denied".into());
        assert_eq!(err.to_string(), "permission denied");
    }
}
