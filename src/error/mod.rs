//! Error handling for the KIS aggregation pipeline.

use std::io;

use chrono::NaiveDate;

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A localized label has no entry in the deployment lookup table
    #[error("Label '{label}' is missing from the '{table}' lookup table")]
    UnmappedLabel {
        /// The label as emitted by the source query
        label: String,
        /// Name of the lookup table that was consulted
        table: String,
    },

    /// A row and its column set disagree in length
    #[error("Row {row} has {actual} values but the column set has {expected}")]
    ShapeMismatch {
        /// Row index within the dataset
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of values found in the row
        actual: usize,
    },

    /// A column set names the same column twice
    #[error("Column '{column}' appears more than once in the column set")]
    DuplicateColumn {
        /// The repeated column name
        column: String,
    },

    /// The data source could not be established
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source ran out before every submitted query produced a dataset
    #[error("Data source exhausted at position {position} (topic '{topic}')")]
    SourceExhausted {
        /// Topic that expected a dataset
        topic: String,
        /// Zero-based pull position
        position: usize,
    },

    /// An aggregator was called before its inputs were accumulated
    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),

    /// A record was rejected by the persistence store
    #[error("Persistence rejected record: {0}")]
    Persistence(#[from] PersistenceError),

    /// Invalid deployment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing a TOML configuration file
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a deployment configuration defect
    ///
    /// Configuration defects need operator attention and are never retried.
    #[must_use]
    pub const fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::UnmappedLabel { .. } | Self::DuplicateColumn { .. } | Self::Config(_)
        )
    }
}

/// Rejections signalled by the persistence store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// A record for the same date already exists
    #[error("record for {date} already exists")]
    Duplicate {
        /// The date carried by the rejected record
        date: NaiveDate,
    },

    /// Any other schema mismatch
    #[error("validation failed: {0}")]
    Validation(String),
}

impl PersistenceError {
    /// Operator-facing explanation of the rejection
    #[must_use]
    pub fn deployment_message(&self) -> String {
        match self {
            Self::Duplicate { date } => format!(
                "Can not write data to row with existing 'dates' value {date}. \
                 The 'dates' column has a field constraint that the value is unique."
            ),
            Self::Validation(msg) => format!("Record failed validation: {msg}"),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
