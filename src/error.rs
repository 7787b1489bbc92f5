//! Error types for report building and rendering.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or rendering a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The config names an audit the runner produced no result for.
    #[error("no result for audit '{audit}' (category '{category}')")]
    MissingResult { category: String, audit: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
