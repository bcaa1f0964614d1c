// SPDX-License-Identifier: MIT

//! Error types for cvrank

use thiserror::Error;

/// Result type alias for cvrank operations
pub type Result<T> = std::result::Result<T, CvRankError>;

/// cvrank error types
#[derive(Error, Debug)]
pub enum CvRankError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No results returned by the evaluation model")]
    NoResults,

    #[error("Could not interpret the server response")]
    UnreadableResponse,
}

impl CvRankError {
    /// Message shown to the user when this error ends a submission attempt.
    ///
    /// Backend and validation errors already carry their wording; everything
    /// else collapses to a generic message rather than leaking internals.
    pub fn user_message(&self) -> String {
        match self {
            CvRankError::Backend(msg) | CvRankError::Validation(msg) => msg.clone(),
            CvRankError::NoResults => "No results returned by the evaluation model.".to_string(),
            CvRankError::UnreadableResponse => {
                "Could not interpret the server response.".to_string()
            }
            _ => "Failed to evaluate the résumés.".to_string(),
        }
    }
}
