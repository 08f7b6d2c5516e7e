//! # Core Module
//!
//! Shared abstractions used by the forest encoder, decoder and the
//! command-line host.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for export, import and logging

pub mod config;

// Re-export commonly used config types
pub use config::{
    ForestConfig,
    ExportConfig,
    ImportConfig,
    LoggingConfig,
    Config,
    ConfigError,
};
