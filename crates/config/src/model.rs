//! Typed, validated configuration model

use crate::schema::{
    CompilerDocument, CompilerSettingsDocument, ConfigDocument, Entries, NetworkDocument,
    NetworkIdDocument, OptimizerDocument,
};
use alloy::primitives::Address;
use std::collections::BTreeMap;
use std::fmt;
use toolchain_types::{utils, ConfigError, Result, Section, SemVer};

/// Optimizer runs used by solc when none are given
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Loaded configuration
///
/// Built once by [`ConfigLoader`](crate::ConfigLoader) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    networks: BTreeMap<String, NetworkProfile>,
    compilers: BTreeMap<String, CompilerProfile>,
}

/// Connection parameters for a chain client endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Profile name
    pub name: String,
    /// Hostname or IP literal
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Chain id the client must see on connect
    pub network_id: NetworkId,
    /// Sender account
    pub from: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price in wei
    pub gas_price: Option<u64>,
}

/// Chain id filter applied at connect time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetworkId {
    /// Accept whatever chain the endpoint reports
    Any,
    /// Accept only this chain id
    Specific(String),
}

/// Version and settings bundle for a contract compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerProfile {
    /// Compiler name (e.g. `solc`)
    pub name: String,
    /// Exact compiler release
    pub version: SemVer,
    /// Optimizer settings, passed through unchanged
    pub optimizer: OptimizerSettings,
    /// Target EVM revision
    pub evm_version: Option<String>,
}

/// Compiler optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerSettings {
    /// Whether the optimizer runs
    pub enabled: bool,
    /// Kept even when the optimizer is disabled
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

impl Configuration {
    pub(crate) fn from_parts(
        networks: BTreeMap<String, NetworkProfile>,
        compilers: BTreeMap<String, CompilerProfile>,
    ) -> Self {
        Self { networks, compilers }
    }

    /// Look up a network profile by name
    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks.get(name).ok_or_else(|| ConfigError::NotFound {
            section: Section::Networks,
            name: name.to_string(),
        })
    }

    /// Look up a compiler profile by name
    pub fn compiler(&self, name: &str) -> Result<&CompilerProfile> {
        self.compilers.get(name).ok_or_else(|| ConfigError::NotFound {
            section: Section::Compilers,
            name: name.to_string(),
        })
    }

    pub fn networks(&self) -> &BTreeMap<String, NetworkProfile> {
        &self.networks
    }

    pub fn compilers(&self) -> &BTreeMap<String, CompilerProfile> {
        &self.compilers
    }

    /// Convert back into the document shape
    pub fn to_document(&self) -> ConfigDocument {
        let networks: Entries<NetworkDocument> = self
            .networks
            .values()
            .map(|network| (network.name.clone(), NetworkDocument::from(network)))
            .collect();
        let compilers: Entries<CompilerDocument> = self
            .compilers
            .values()
            .map(|compiler| (compiler.name.clone(), CompilerDocument::from(compiler)))
            .collect();

        ConfigDocument {
            networks: Some(networks),
            compilers: Some(compilers),
        }
    }
}

impl NetworkProfile {
    /// HTTP endpoint of the chain client
    pub fn rpc_url(&self) -> String {
        utils::http_endpoint(&self.host, self.port)
    }
}

impl NetworkId {
    /// Marker used in documents for [`NetworkId::Any`]
    pub const WILDCARD: &'static str = "*";

    pub fn parse(value: &str) -> Self {
        if value == Self::WILDCARD {
            NetworkId::Any
        } else {
            NetworkId::Specific(value.to_string())
        }
    }

    /// Whether a client connected to `chain_id` satisfies this filter
    pub fn matches(&self, chain_id: u64) -> bool {
        match self {
            NetworkId::Any => true,
            NetworkId::Specific(id) => *id == chain_id.to_string(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, NetworkId::Any)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::Any => f.write_str(Self::WILDCARD),
            NetworkId::Specific(id) => f.write_str(id),
        }
    }
}

impl From<NetworkIdDocument> for NetworkId {
    fn from(doc: NetworkIdDocument) -> Self {
        match doc {
            NetworkIdDocument::Number(id) => NetworkId::Specific(id.to_string()),
            NetworkIdDocument::Text(text) => NetworkId::parse(&text),
        }
    }
}

impl CompilerProfile {
    /// The `settings` object of solc's standard-JSON input
    pub fn solc_settings(&self) -> serde_json::Value {
        let mut settings = serde_json::json!({
            "optimizer": {
                "enabled": self.optimizer.enabled,
                "runs": self.optimizer.runs,
            }
        });
        if let Some(ref evm_version) = self.evm_version {
            settings["evmVersion"] = serde_json::Value::String(evm_version.clone());
        }
        settings
    }
}

impl From<&NetworkProfile> for NetworkDocument {
    fn from(network: &NetworkProfile) -> Self {
        Self {
            host: Some(network.host.clone()),
            port: Some(i128::from(network.port)),
            network_id: Some(NetworkIdDocument::Text(network.network_id.to_string())),
            from: network.from.map(|address| address.to_string()),
            gas: network.gas,
            gas_price: network.gas_price,
        }
    }
}

impl From<&CompilerProfile> for CompilerDocument {
    fn from(compiler: &CompilerProfile) -> Self {
        Self {
            version: Some(compiler.version.to_string()),
            settings: Some(CompilerSettingsDocument {
                optimizer: Some(OptimizerDocument {
                    enabled: Some(compiler.optimizer.enabled),
                    runs: Some(i128::from(compiler.optimizer.runs)),
                }),
                evm_version: compiler.evm_version.clone(),
            }),
        }
    }
}
