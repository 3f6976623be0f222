//! Error types for `covidx`.
//!
//! This module provides a unified error type for all index codec operations.
//! Error codes follow the pattern `COVIDX-XXX` so log lines can be grepped
//! across the library and the CLI.

use thiserror::Error;

/// Result type alias for `covidx` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or decoding covered-column index keys.
#[derive(Error, Debug)]
pub enum Error {
    /// Column group declared without any covered column (COVIDX-001).
    #[error("[COVIDX-001] Column group for table '{0}' must cover at least one column")]
    EmptyColumnGroup(String),

    /// Covered column could not be built or parsed (COVIDX-002).
    #[error("[COVIDX-002] Invalid covered column: {0}")]
    InvalidColumn(String),

    /// Required key absent from an index specification property map (COVIDX-003).
    #[error("[COVIDX-003] Missing index specification key '{0}'")]
    MissingSpecKey(String),

    /// Index specification value could not be interpreted (COVIDX-004).
    #[error("[COVIDX-004] Invalid value for index specification key '{key}': {message}")]
    InvalidSpecValue {
        /// Property key holding the bad value.
        key: String,
        /// What went wrong.
        message: String,
    },

    /// Cell does not belong to the row the store was opened for (COVIDX-005).
    #[error("[COVIDX-005] Cell row {actual} does not match store row {expected}")]
    RowMismatch {
        /// Hex-encoded row of the store.
        expected: String,
        /// Hex-encoded row of the rejected cell.
        actual: String,
    },

    /// Underlying cursor failed during a resolution pass (COVIDX-006).
    #[error("[COVIDX-006] Scan error: {0}")]
    Scan(String),

    /// Composite key is too short or its trailer is inconsistent (COVIDX-007).
    #[error("[COVIDX-007] Malformed index key: {0}")]
    Format(String),

    /// Length, count or ordinal does not fit its encoded width (COVIDX-008).
    #[error("[COVIDX-008] Overflow: {0}")]
    Overflow(String),

    /// Configuration error (COVIDX-009).
    #[error("[COVIDX-009] Configuration error: {0}")]
    Config(String),

    /// IO error (COVIDX-010).
    #[error("[COVIDX-010] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code (e.g., "COVIDX-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyColumnGroup(_) => "COVIDX-001",
            Self::InvalidColumn(_) => "COVIDX-002",
            Self::MissingSpecKey(_) => "COVIDX-003",
            Self::InvalidSpecValue { .. } => "COVIDX-004",
            Self::RowMismatch { .. } => "COVIDX-005",
            Self::Scan(_) => "COVIDX-006",
            Self::Format(_) => "COVIDX-007",
            Self::Overflow(_) => "COVIDX-008",
            Self::Config(_) => "COVIDX-009",
            Self::Io(_) => "COVIDX-010",
        }
    }

    /// Returns true if re-running the same operation could succeed.
    ///
    /// Configuration and format errors are deterministic in their input and
    /// never recover on their own.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Scan(_) | Self::Io(_))
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
