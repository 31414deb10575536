//! Configuration document schema
//!
//! These types mirror the on-disk document as written by hand. Every field
//! is optional here so that missing values surface as typed
//! [`ConfigError::MalformedConfig`](toolchain_types::ConfigError) errors
//! naming the offending path, instead of opaque deserializer messages.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Root of a configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Named network profiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Entries<NetworkDocument>>,
    /// Named compiler profiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilers: Option<Entries<CompilerDocument>>,
}

/// Network profile as written in the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    /// Hostname or IP literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// TCP port; kept wide so out-of-range values can be reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i128>,
    /// Chain id filter, `"*"` for any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<NetworkIdDocument>,
    /// Sender account for transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Gas limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price in wei
    #[serde(default, alias = "gasPrice", skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,
}

/// Network ids are written either as strings or as bare integers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkIdDocument {
    Number(u64),
    Text(String),
}

/// Compiler profile as written in the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CompilerSettingsDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerSettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerDocument>,
    #[serde(default, alias = "evmVersion", skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<i128>,
}

/// Ordered map entries that keep duplicate keys
///
/// Plain maps silently collapse repeated keys, which would hide two
/// profiles declared under the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<T>(pub Vec<(String, T)>);

impl<T> Entries<T> {
    pub fn new() -> Self {
        Entries(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// First key that appears more than once
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.0
            .iter()
            .map(|(key, _)| key.as_str())
            .find(|key| !seen.insert(*key))
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, T)> for Entries<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Entries(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Entries<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Serialize> Serialize for Entries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of profile names to profiles")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(Entries(entries))
            }

            // `networks:` with no body
            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Entries::new())
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

impl ConfigDocument {
    /// The stock local development setup: a Ganache chain on 7545 and solc
    /// 0.8.19 with the optimizer at 200 runs
    pub fn example() -> Self {
        let networks = Entries(vec![(
            "development".to_string(),
            NetworkDocument {
                host: Some("127.0.0.1".to_string()),
                port: Some(7545),
                network_id: Some(NetworkIdDocument::Text("*".to_string())),
                ..Default::default()
            },
        )]);

        let compilers = Entries(vec![(
            "solc".to_string(),
            CompilerDocument {
                version: Some("0.8.19".to_string()),
                settings: Some(CompilerSettingsDocument {
                    optimizer: Some(OptimizerDocument {
                        enabled: Some(true),
                        runs: Some(200),
                    }),
                    evm_version: None,
                }),
            },
        )]);

        Self {
            networks: Some(networks),
            compilers: Some(compilers),
        }
    }
}
