//! Configuration management for the contract toolchain
//!
//! This crate parses and validates the toolchain configuration document
//! (local chain network profiles and contract compiler profiles) and
//! exposes it as an immutable, typed [`Configuration`].

pub mod loader;
pub mod logging;
pub mod model;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, DocumentFormat};
pub use logging::{init_logging, LoggingConfig};
pub use model::*;
pub use schema::ConfigDocument;
pub use toolchain_types::{ConfigError, Result, Section, SemVer};
pub use validation::*;

use std::path::Path;

/// Load a configuration file with the default loader
pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
    ConfigLoader::new().load(path)
}

/// Look up a network profile by name
pub fn get<'a>(config: &'a Configuration, network_name: &str) -> Result<&'a NetworkProfile> {
    config.network(network_name)
}

/// Look up a compiler profile by name
pub fn get_compiler<'a>(
    config: &'a Configuration,
    compiler_name: &str,
) -> Result<&'a CompilerProfile> {
    config.compiler(compiler_name)
}
