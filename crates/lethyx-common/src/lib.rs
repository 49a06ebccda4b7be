//! lethyx-common: Shared types, errors, and configuration used across all Lethyx crates.

pub mod error;
pub mod pair;
pub mod config;

// Re-export commonly used types
pub use error::{LethyxError, Result};
pub use pair::{GenePair, KnownPairSet};
pub use config::LethyxConfig;
