//! Error types for the contract toolchain configuration

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level section of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The `networks` mapping
    Networks,
    /// The `compilers` mapping
    Compilers,
}

impl Section {
    /// Key of this section in the document
    pub fn key(&self) -> &'static str {
        match self {
            Section::Networks => "networks",
            Section::Compilers => "compilers",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Networks => f.write_str("network"),
            Section::Compilers => f.write_str("compiler"),
        }
    }
}

/// Configuration loading and lookup errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required field missing, wrong shape, or unparseable document
    #[error("Malformed configuration at {field}: {message}")]
    MalformedConfig { field: String, message: String },

    /// Port outside the TCP range
    #[error("Invalid port for network {network}: {port} (expected 0-65535)")]
    InvalidPort { network: String, port: i128 },

    /// Compiler version is not a semantic version
    #[error("Invalid version for compiler {compiler}: {version:?}: {reason}")]
    InvalidVersion {
        compiler: String,
        version: String,
        reason: String,
    },

    /// Two entries of the same section share a name
    #[error("Duplicate {section} entry: {key}")]
    DuplicateKey { section: Section, key: String },

    /// Lookup of an undeclared profile
    #[error("{section} profile not found: {name}")]
    NotFound { section: Section, name: String },

    /// The source document could not be read
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::MalformedConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::malformed(field, "missing required field")
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
