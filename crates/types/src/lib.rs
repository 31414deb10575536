//! Shared types for the contract toolchain configuration
//!
//! This crate contains the error taxonomy and the small validation helpers
//! used by the configuration loader.

pub mod error;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use error::{ConfigError, Result, Section};
pub use version::{SemVer, SemVerError};
