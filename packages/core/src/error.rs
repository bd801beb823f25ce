use std::error::Error;
use std::fmt;

use crate::analysis::{AnalysisError, ProviderError};

/// Unified application error.
///
/// Everything `main` can fail with, mapped to a message for the user.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Parse(String),
    NotFound(String),
    Unknown(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::ChannelNotFound { handle } => AppError::NotFound(format!(
                "channel '{}'. Please check the handle and try again.",
                handle
            )),
            AnalysisError::Provider(ProviderError::FormatError { message }) => {
                AppError::Parse(message)
            }
            AnalysisError::Provider(err) => AppError::Network(format!(
                "{}. Please check your API key and ensure you have YouTube Data API access.",
                err
            )),
            other => AppError::Unknown(other.to_string()),
        }
    }
}
