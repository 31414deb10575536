//! Configuration lint checks
//!
//! A [`Configuration`] is already structurally valid by the time it reaches
//! this module. The checks here only flag settings that load fine but are
//! likely to surprise the compiler or chain client downstream.

use crate::model::{CompilerProfile, Configuration, NetworkProfile, DEFAULT_OPTIMIZER_RUNS};
use toolchain_types::utils;

/// Optimizer runs above this are almost always a typo
const MAX_REASONABLE_RUNS: u32 = 1_000_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Collect warnings for a loaded configuration
    pub fn validate(config: &Configuration) -> ValidationReport {
        let mut report = ValidationReport::new();

        if config.networks().is_empty() {
            report.add_warning("networks", "No networks configured, network lookups will fail");
        }

        for network in config.networks().values() {
            Self::validate_network(network, &mut report);
        }

        for compiler in config.compilers().values() {
            Self::validate_compiler(compiler, &mut report);
        }

        report
    }

    fn validate_network(network: &NetworkProfile, report: &mut ValidationReport) {
        let field = format!("networks.{}", network.name);

        if network.port == 0 {
            report.add_warning(
                &format!("{}.port", field),
                "Port 0 asks the OS for an ephemeral port, clients cannot connect to it",
            );
        } else if network.port < 1024 {
            report.add_warning(
                &format!("{}.port", field),
                &format!("Port {} is below 1024, may require elevated privileges", network.port),
            );
        }

        if network.network_id.is_any() && !utils::is_loopback_host(&network.host) {
            report.add_warning(
                &format!("{}.network_id", field),
                &format!(
                    "Wildcard network id on non-local host {} will accept any chain",
                    network.host
                ),
            );
        }

        if network.gas == Some(0) {
            report.add_warning(
                &format!("{}.gas", field),
                "Gas limit of 0 will reject every transaction",
            );
        }
    }

    fn validate_compiler(compiler: &CompilerProfile, report: &mut ValidationReport) {
        let field = format!("compilers.{}", compiler.name);

        if !compiler.optimizer.enabled && compiler.optimizer.runs != DEFAULT_OPTIMIZER_RUNS {
            report.add_warning(
                &format!("{}.settings.optimizer.runs", field),
                &format!(
                    "runs is set to {} but the optimizer is disabled, the value is ignored",
                    compiler.optimizer.runs
                ),
            );
        }

        if compiler.optimizer.runs > MAX_REASONABLE_RUNS {
            report.add_warning(
                &format!("{}.settings.optimizer.runs", field),
                &format!("Optimizer runs is very high ({})", compiler.optimizer.runs),
            );
        }

        if compiler.version.is_prerelease() {
            report.add_warning(
                &format!("{}.version", field),
                &format!("Compiler version {} is a pre-release", compiler.version),
            );
        }
    }
}

/// Validation report containing warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationIssue>,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} warnings", self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
