//! Error types for loading and validating cubes.

use std::fmt;
use thiserror::Error;

/// Malformed cube text, with location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl FormatError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = self.column {
            write!(
                f,
                "line {}, column {}: {}\n  | {}\n  | {}^",
                self.line_number,
                col,
                self.message,
                self.line_content,
                " ".repeat(col.saturating_sub(1))
            )
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug, Error)]
pub enum CubeError {
    #[error("invalid cube format: {0}")]
    Format(#[from] FormatError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cube size must be at least 2, got {0}")]
    InvalidSize(usize),

    /// Some color no longer covers exactly `size * size` cells. Only a defect in
    /// the twist engine can cause this.
    #[error("cube of size {size} not consistent: color counts {counts:?}")]
    Inconsistent { size: usize, counts: [usize; 6] },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = FormatError::new(3, "expected 2 colors", "WWW");
        assert_eq!(err.to_string(), "line 3: expected 2 colors\n  | WWW");

        let err = err.with_column(2);
        assert!(err.to_string().starts_with("line 3, column 2"));
        assert!(err.to_string().ends_with("  |  ^"));
    }

    #[test]
    fn test_cube_error_wraps_format() {
        let err: CubeError = FormatError::new(1, "bad size", "x").into();
        assert!(matches!(err, CubeError::Format(_)));
        assert!(err.to_string().contains("bad size"));
    }
}
