//! Forest import/export errors

use thiserror::Error;

/// Errors raised while encoding or decoding forest placement data
#[derive(Error, Debug)]
pub enum ForestError {
    /// A record could not be converted
    ///
    /// `line` is the 1-based input line for decoder errors and `None` for
    /// records handed to the encoder.
    #[error("Invalid input{}: {reason}", .line.map(|l| format!(" on line {l}")).unwrap_or_default())]
    InvalidInput {
        /// Input line the record came from
        line: Option<usize>,
        /// What was wrong with the record
        reason: String,
    },

    /// The destination container already exists
    #[error("Collection already exists: {0}")]
    NameCollision(String),

    /// The sink or source could not be written or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ForestError {
    /// Build an `InvalidInput` error not tied to an input line
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            line: None,
            reason: reason.into(),
        }
    }

    /// Attach an input line number to an `InvalidInput` error
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::InvalidInput { reason, .. } => Self::InvalidInput {
                line: Some(line),
                reason,
            },
            other => other,
        }
    }

    /// Whether this error concerns a single record rather than the whole batch
    pub const fn is_record_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
