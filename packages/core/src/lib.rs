// Library root — exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod analysis;
pub mod cache;
pub mod report;
pub mod services;

// Terminal-facing concerns used by the binary.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
