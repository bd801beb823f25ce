//! Channel Analysis Module
//!
//! Collects a channel's videos, analyses titles and upload timing, and
//! projects subscriber/view growth from a synthesized history.

pub mod collector;
pub mod config;
pub mod error;
pub mod history;
pub mod noise;
pub mod projector;
pub mod provider;
pub mod tokenizer;
pub mod types;
pub mod videos;

#[cfg(test)]
mod tests;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, ProviderError};
pub use noise::{FixedNoise, NoiseSource, RandomNoise};
pub use provider::ChannelDataProvider;
pub use types::*;
