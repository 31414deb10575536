//! Configuration loader implementation

use crate::model::{
    CompilerProfile, Configuration, NetworkId, NetworkProfile, OptimizerSettings,
    DEFAULT_OPTIMIZER_RUNS,
};
use crate::schema::{CompilerDocument, ConfigDocument, Entries, NetworkDocument};
use crate::validation::ConfigValidator;
use alloy::primitives::Address;
use figment::{Figment, Provider};
use std::collections::BTreeMap;
use std::path::Path;
use toolchain_types::{utils, ConfigError, Result, Section, SemVer};
use tracing::{debug, info, warn};

/// Text format of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension, YAML when there is none
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None => Ok(DocumentFormat::Yaml),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(DocumentFormat::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            Some(ext) => Err(ConfigError::malformed(
                "document",
                format!("Unsupported configuration format: .{}", ext),
            )),
        }
    }
}

/// Configuration loader for YAML/JSON documents and figment providers
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader {
    require_networks: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject documents without any network profile
    ///
    /// Callers that will connect to a chain should turn this on.
    pub fn require_networks(mut self, required: bool) -> Self {
        self.require_networks = required;
        self
    }

    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(&self, config_path: P) -> Result<Configuration> {
        let config_path = config_path.as_ref();
        let format = DocumentFormat::from_path(config_path)?;

        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;

        debug!(path = %config_path.display(), ?format, "Read configuration document");
        self.load_from_str(&content, format)
    }

    /// Load configuration from document text
    pub fn load_from_str(&self, content: &str, format: DocumentFormat) -> Result<Configuration> {
        let document: ConfigDocument = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::malformed("document", e.to_string()))?,
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::malformed("document", e.to_string()))?,
        };

        self.load_document(document)
    }

    /// Load configuration from an in-memory figment provider
    pub fn load_from_provider<T: Provider>(&self, provider: T) -> Result<Configuration> {
        let document: ConfigDocument = Figment::from(provider)
            .extract()
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;

        self.load_document(document)
    }

    /// Validate a parsed document and build the typed configuration
    pub fn load_document(&self, document: ConfigDocument) -> Result<Configuration> {
        let config = self.build(document)?;

        let report = ConfigValidator::validate(&config);
        for issue in &report.warnings {
            warn!(field = %issue.field, "{}", issue.message);
        }

        info!(
            networks = config.networks().len(),
            compilers = config.compilers().len(),
            warnings = report.warnings.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn build(&self, document: ConfigDocument) -> Result<Configuration> {
        let networks = document.networks.unwrap_or_default();
        let compilers = document.compilers.unwrap_or_default();

        check_unique(Section::Networks, &networks)?;
        check_unique(Section::Compilers, &compilers)?;

        if self.require_networks && networks.is_empty() {
            return Err(ConfigError::malformed(
                "networks",
                "At least one network must be configured",
            ));
        }

        if compilers.is_empty() {
            return Err(ConfigError::malformed(
                "compilers",
                "At least one compiler must be configured",
            ));
        }

        let mut network_profiles = BTreeMap::new();
        for (name, network) in networks {
            let profile = build_network(name, network)?;
            network_profiles.insert(profile.name.clone(), profile);
        }

        let mut compiler_profiles = BTreeMap::new();
        for (name, compiler) in compilers {
            let profile = build_compiler(name, compiler)?;
            compiler_profiles.insert(profile.name.clone(), profile);
        }

        Ok(Configuration::from_parts(network_profiles, compiler_profiles))
    }

    /// Write the stock development configuration as YAML
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml_content = serde_yaml::to_string(&ConfigDocument::example())
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;

        std::fs::write(path, yaml_content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn check_unique<T>(section: Section, entries: &Entries<T>) -> Result<()> {
    match entries.first_duplicate() {
        Some(key) => Err(ConfigError::DuplicateKey {
            section,
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}

fn build_network(name: String, doc: NetworkDocument) -> Result<NetworkProfile> {
    let field = |key: &str| format!("networks.{}.{}", name, key);

    if name.trim().is_empty() {
        return Err(ConfigError::malformed("networks", "Network name cannot be empty"));
    }

    let host = doc.host.ok_or_else(|| ConfigError::missing(field("host")))?;
    if !utils::is_valid_host(&host) {
        return Err(ConfigError::malformed(
            field("host"),
            format!("Invalid host {:?}", host),
        ));
    }

    let port = doc.port.ok_or_else(|| ConfigError::missing(field("port")))?;
    let port = u16::try_from(port).map_err(|_| ConfigError::InvalidPort {
        network: name.clone(),
        port,
    })?;

    let network_id = doc
        .network_id
        .map(NetworkId::from)
        .ok_or_else(|| ConfigError::missing(field("network_id")))?;
    if network_id == NetworkId::Specific(String::new()) {
        return Err(ConfigError::malformed(field("network_id"), "Network id cannot be empty"));
    }

    let from = match doc.from {
        Some(ref from) => Some(from.parse::<Address>().map_err(|e| {
            ConfigError::malformed(
                field("from"),
                format!("Invalid address {}: {}", utils::sanitize_for_logging(from), e),
            )
        })?),
        None => None,
    };

    debug!(
        network = %name,
        host = %host,
        port,
        network_id = %network_id,
        "Parsed network profile"
    );

    Ok(NetworkProfile {
        name,
        host,
        port,
        network_id,
        from,
        gas: doc.gas,
        gas_price: doc.gas_price,
    })
}

fn build_compiler(name: String, doc: CompilerDocument) -> Result<CompilerProfile> {
    let field = |key: &str| format!("compilers.{}.{}", name, key);

    if name.trim().is_empty() {
        return Err(ConfigError::malformed("compilers", "Compiler name cannot be empty"));
    }

    let raw_version = doc.version.ok_or_else(|| ConfigError::missing(field("version")))?;
    let version = raw_version
        .parse::<SemVer>()
        .map_err(|e| ConfigError::InvalidVersion {
            compiler: name.clone(),
            version: raw_version.clone(),
            reason: e.to_string(),
        })?;

    let settings = doc.settings.unwrap_or_default();
    let optimizer = match settings.optimizer {
        Some(optimizer) => {
            let runs = match optimizer.runs {
                Some(runs) => u32::try_from(runs).map_err(|_| {
                    ConfigError::malformed(
                        field("settings.optimizer.runs"),
                        format!(
                            "runs must be an integer between 0 and {}, got {}",
                            u32::MAX,
                            runs
                        ),
                    )
                })?,
                None => DEFAULT_OPTIMIZER_RUNS,
            };
            OptimizerSettings {
                enabled: optimizer.enabled.unwrap_or(false),
                runs,
            }
        }
        None => OptimizerSettings::default(),
    };

    debug!(
        compiler = %name,
        version = %version,
        optimizer = optimizer.enabled,
        runs = optimizer.runs,
        "Parsed compiler profile"
    );

    Ok(CompilerProfile {
        name,
        version,
        optimizer,
        evm_version: settings.evm_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const DEVELOPMENT: &str = r#"
networks:
  development:
    host: "127.0.0.1"
    port: 7545
    network_id: "*"
compilers:
  solc:
    version: "0.8.19"
    settings:
      optimizer:
        enabled: true
        runs: 200
"#;

    fn load_yaml(content: &str) -> Result<Configuration> {
        ConfigLoader::new().load_from_str(content, DocumentFormat::Yaml)
    }

    #[test]
    fn test_load_from_string() {
        let config = load_yaml(DEVELOPMENT).unwrap();

        let network = config.network("development").unwrap();
        assert_eq!(network.host, "127.0.0.1");
        assert_eq!(network.port, 7545);
        assert_eq!(network.network_id, NetworkId::Any);

        let compiler = config.compiler("solc").unwrap();
        assert_eq!(compiler.version.to_string(), "0.8.19");
        assert_eq!(
            compiler.optimizer,
            OptimizerSettings {
                enabled: true,
                runs: 200
            }
        );
    }

    #[test]
    fn test_port_out_of_range() {
        for port in ["-1", "70000", "99999999999999999999"] {
            let yaml = DEVELOPMENT.replace("7545", port);
            match load_yaml(&yaml) {
                Err(ConfigError::InvalidPort { network, port: got }) => {
                    assert_eq!(network, "development");
                    assert_eq!(got.to_string(), port);
                }
                other => panic!("expected InvalidPort for {}, got {:?}", port, other),
            }
        }
    }

    #[test]
    fn test_port_boundaries() {
        let config = load_yaml(&DEVELOPMENT.replace("7545", "65535")).unwrap();
        assert_eq!(config.network("development").unwrap().port, 65535);

        let config = load_yaml(&DEVELOPMENT.replace("7545", "0")).unwrap();
        assert_eq!(config.network("development").unwrap().port, 0);
    }

    #[test]
    fn test_duplicate_network() {
        let yaml = r#"
networks:
  development:
    host: "127.0.0.1"
    port: 7545
    network_id: "*"
  development:
    host: "127.0.0.1"
    port: 8545
    network_id: "*"
compilers:
  solc:
    version: "0.8.19"
"#;
        match load_yaml(yaml) {
            Err(ConfigError::DuplicateKey { section, key }) => {
                assert_eq!(section, Section::Networks);
                assert_eq!(key, "development");
            }
            other => panic!("expected DuplicateKey, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_compiler() {
        let json = r#"{
  "compilers": {
    "solc": {"version": "0.8.19"},
    "solc": {"version": "0.8.20"}
  }
}"#;
        let result = ConfigLoader::new().load_from_str(json, DocumentFormat::Json);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateKey { section: Section::Compilers, .. })
        ));
    }

    #[test]
    fn test_invalid_version() {
        let yaml = DEVELOPMENT.replace("0.8.19", "not-a-version");
        match load_yaml(&yaml) {
            Err(ConfigError::InvalidVersion { compiler, version, .. }) => {
                assert_eq!(compiler, "solc");
                assert_eq!(version, "not-a-version");
            }
            other => panic!("expected InvalidVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields() {
        let yaml = DEVELOPMENT.replace("    host: \"127.0.0.1\"\n", "");
        match load_yaml(&yaml) {
            Err(ConfigError::MalformedConfig { field, .. }) => {
                assert_eq!(field, "networks.development.host");
            }
            other => panic!("expected MalformedConfig, got {:?}", other),
        }

        let yaml = DEVELOPMENT.replace("    network_id: \"*\"\n", "");
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "networks.development.network_id"
        ));

        let yaml = DEVELOPMENT.replace("    version: \"0.8.19\"\n", "");
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "compilers.solc.version"
        ));
    }

    #[test]
    fn test_empty_host() {
        let yaml = DEVELOPMENT.replace("\"127.0.0.1\"", "\"\"");
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "networks.development.host"
        ));
    }

    #[test]
    fn test_wrong_shape() {
        let yaml = DEVELOPMENT.replace("7545", "\"seventy-five\"");
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "document"
        ));

        assert!(matches!(
            load_yaml("networks: [1, 2, 3]"),
            Err(ConfigError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_compilers_required() {
        let yaml = r#"
networks:
  development:
    host: "127.0.0.1"
    port: 7545
    network_id: "*"
"#;
        assert!(matches!(
            load_yaml(yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "compilers"
        ));
    }

    #[test]
    fn test_networks_optional_unless_required() {
        let yaml = r#"
compilers:
  solc:
    version: "0.8.19"
"#;
        let config = load_yaml(yaml).unwrap();
        assert!(config.networks().is_empty());
        assert!(matches!(
            config.network("development"),
            Err(ConfigError::NotFound { .. })
        ));

        let strict = ConfigLoader::new().require_networks(true);
        assert!(matches!(
            strict.load_from_str(yaml, DocumentFormat::Yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "networks"
        ));
        assert!(strict.load_from_str(DEVELOPMENT, DocumentFormat::Yaml).is_ok());
    }

    #[test]
    fn test_optimizer_defaults() {
        let yaml = r#"
compilers:
  solc:
    version: "0.8.19"
  solc-legacy:
    version: "0.4.26"
    settings:
      optimizer:
        enabled: true
"#;
        let config = load_yaml(yaml).unwrap();
        assert_eq!(config.compiler("solc").unwrap().optimizer, OptimizerSettings::default());
        assert_eq!(
            config.compiler("solc-legacy").unwrap().optimizer,
            OptimizerSettings {
                enabled: true,
                runs: DEFAULT_OPTIMIZER_RUNS
            }
        );
    }

    #[test]
    fn test_disabled_optimizer_preserves_runs() {
        let yaml = DEVELOPMENT
            .replace("enabled: true", "enabled: false")
            .replace("runs: 200", "runs: 1000");
        let config = load_yaml(&yaml).unwrap();
        let optimizer = config.compiler("solc").unwrap().optimizer;
        assert!(!optimizer.enabled);
        assert_eq!(optimizer.runs, 1000);
    }

    #[test]
    fn test_negative_runs() {
        let yaml = DEVELOPMENT.replace("runs: 200", "runs: -5");
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "compilers.solc.settings.optimizer.runs"
        ));
    }

    #[test]
    fn test_runs_limit() {
        let yaml = DEVELOPMENT.replace("runs: 200", "runs: 4294967295");
        let config = load_yaml(&yaml).unwrap();
        assert_eq!(config.compiler("solc").unwrap().optimizer.runs, u32::MAX);

        let yaml = DEVELOPMENT.replace("runs: 200", "runs: 4294967296");
        match load_yaml(&yaml) {
            Err(ConfigError::MalformedConfig { field, message }) => {
                assert_eq!(field, "compilers.solc.settings.optimizer.runs");
                assert_eq!(
                    message,
                    "runs must be an integer between 0 and 4294967295, got 4294967296"
                );
            }
            other => panic!("expected MalformedConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_network_fields() {
        let yaml = r#"
networks:
  ganache:
    host: "localhost"
    port: 8545
    network_id: 5777
    from: "0x627306090abab3a6e1400e9345bc60c78a8bef57"
    gas: 6721975
    gasPrice: 20000000000
compilers:
  solc:
    version: "0.8.19"
    settings:
      evmVersion: "paris"
"#;
        let config = load_yaml(yaml).unwrap();
        let network = config.network("ganache").unwrap();
        assert_eq!(network.network_id, NetworkId::Specific("5777".to_string()));
        assert_eq!(
            network.from,
            Some(
                "0x627306090abaB3A6e1400e9345bC60c78a8BEf57"
                    .parse::<Address>()
                    .unwrap()
            )
        );
        assert_eq!(network.gas, Some(6_721_975));
        assert_eq!(network.gas_price, Some(20_000_000_000));
        assert_eq!(
            config.compiler("solc").unwrap().evm_version.as_deref(),
            Some("paris")
        );
    }

    #[test]
    fn test_invalid_from_address() {
        let yaml = DEVELOPMENT.replace(
            "    network_id: \"*\"\n",
            "    network_id: \"*\"\n    from: \"0x1234\"\n",
        );
        assert!(matches!(
            load_yaml(&yaml),
            Err(ConfigError::MalformedConfig { ref field, .. }) if field == "networks.development.from"
        ));
    }

    #[test]
    fn test_non_ascii_from_address() {
        let yaml = DEVELOPMENT.replace(
            "    network_id: \"*\"\n",
            "    network_id: \"*\"\n    from: \"0x1ééééééééééééééééééé\"\n",
        );
        match load_yaml(&yaml) {
            Err(ConfigError::MalformedConfig { field, message }) => {
                assert_eq!(field, "networks.development.from");
                assert!(message.contains("0x1ééé...éééé"));
            }
            other => panic!("expected MalformedConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_document_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("toolchain.yaml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("toolchain.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("toolchain.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("toolchain")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(DocumentFormat::from_path(Path::new("toolchain.toml")).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new().load("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_create_example() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::create_example(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("networks:"));
        assert!(content.contains("compilers:"));

        let config = ConfigLoader::new()
            .load_from_str(&content, DocumentFormat::Yaml)
            .unwrap();
        assert_eq!(config, load_yaml(DEVELOPMENT).unwrap());
    }
}
