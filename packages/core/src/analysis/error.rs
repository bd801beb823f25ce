//! Error types for channel analysis operations

use thiserror::Error;

use crate::analysis::types::Metric;

/// Errors that abort an analysis operation
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Channel not found: {handle}")]
    ChannelNotFound { handle: String },

    #[error("Insufficient data for calculation: {operation}")]
    InsufficientData { operation: String },

    #[error("Cannot derive {metric} growth: first historical value is zero")]
    DegenerateSeed { metric: Metric },

    #[error("History window of {days} days reaches outside the supported calendar")]
    HistoryWindow { days: u32 },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Data provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors from channel data providers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Data format error: {message}")]
    FormatError { message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl AnalysisError {
    pub fn channel_not_found(handle: impl Into<String>) -> Self {
        Self::ChannelNotFound { handle: handle.into() }
    }

    pub fn insufficient_data(operation: impl Into<String>) -> Self {
        Self::InsufficientData { operation: operation.into() }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache { message: message.into() }
    }
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError { message: message.into() }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError { message: message.into() }
    }
}
