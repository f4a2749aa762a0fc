// Configuration management module
// This file handles loading of application settings from environment
// variables and the immutable configuration snapshot threaded through
// every bridge call
//
// Numan Thabit 2025 Nov

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    Mainnet,
    Testnet,
}

impl NetworkMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "prod" => Ok(NetworkMode::Mainnet),
            "testnet" | "test" => Ok(NetworkMode::Testnet),
            other => bail!("unsupported network mode: {other}"),
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Mainnet => f.write_str("mainnet"),
            NetworkMode::Testnet => f.write_str("testnet"),
        }
    }
}

/// Identifies which catalog contents a configuration expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub network: NetworkMode,
    pub dealer_id: Option<String>,
}

/// Immutable configuration snapshot passed into every bridge call.
///
/// Switching network mode or dealer produces a new snapshot; catalogs notice
/// the changed [`CatalogKey`] and reload on their next lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    network: NetworkMode,
    dealer_id: Option<String>,
}

impl CoreConfig {
    pub fn new(network: NetworkMode) -> Self {
        Self {
            network,
            dealer_id: None,
        }
    }

    pub fn mainnet() -> Self {
        Self::new(NetworkMode::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::new(NetworkMode::Testnet)
    }

    pub fn network(&self) -> NetworkMode {
        self.network
    }

    pub fn dealer_id(&self) -> Option<&str> {
        self.dealer_id.as_deref()
    }

    pub fn with_network_mode(&self, network: NetworkMode) -> Self {
        Self {
            network,
            ..self.clone()
        }
    }

    pub fn with_dealer_id(&self, dealer_id: Option<String>) -> Self {
        Self {
            dealer_id: dealer_id.filter(|id| !id.is_empty()),
            ..self.clone()
        }
    }

    pub fn catalog_key(&self) -> CatalogKey {
        CatalogKey {
            network: self.network,
            dealer_id: self.dealer_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Network mode, "mainnet" or "testnet" (defaults to mainnet)
    pub network: Option<String>,
    /// Market-maker dealer id used to filter settlement rules (optional)
    pub dealer_id: Option<String>,
    /// JSON-RPC catalog endpoint for mainnet
    pub openapi_mainnet: Option<Url>,
    /// JSON-RPC catalog endpoint for testnet
    pub openapi_testnet: Option<Url>,
    /// YAML/JSON catalog file; used instead of the JSON-RPC endpoints when set
    pub catalog_file: Option<PathBuf>,
    /// Listen address of the plan preview API (defaults to 0.0.0.0:8080)
    pub api_addr: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn core_config(&self) -> Result<CoreConfig> {
        let network = match self.network.as_deref() {
            Some(raw) => NetworkMode::parse(raw)?,
            None => NetworkMode::Mainnet,
        };
        Ok(CoreConfig::new(network).with_dealer_id(self.dealer_id.clone()))
    }

    pub fn catalog_source(&self) -> Result<CatalogSourceConfig> {
        if let Some(path) = &self.catalog_file {
            return Ok(CatalogSourceConfig::File(path.clone()));
        }
        match (&self.openapi_mainnet, &self.openapi_testnet) {
            (Some(mainnet), testnet) => Ok(CatalogSourceConfig::OpenApi {
                mainnet: mainnet.clone(),
                testnet: testnet.clone(),
            }),
            (None, _) => {
                bail!("either APP__CATALOG_FILE or APP__OPENAPI_MAINNET must be set")
            }
        }
    }

    pub fn api_addr(&self) -> &str {
        self.api_addr.as_deref().unwrap_or("0.0.0.0:8080")
    }
}

#[derive(Debug, Clone)]
pub enum CatalogSourceConfig {
    File(PathBuf),
    OpenApi { mainnet: Url, testnet: Option<Url> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(network: Option<&str>) -> AppConfig {
        AppConfig {
            network: network.map(str::to_string),
            dealer_id: Some("0xdealer".into()),
            openapi_mainnet: None,
            openapi_testnet: None,
            catalog_file: None,
            api_addr: None,
        }
    }

    #[test]
    fn switching_network_returns_new_snapshot() {
        let mainnet = CoreConfig::mainnet().with_dealer_id(Some("0xabc".into()));
        let testnet = mainnet.with_network_mode(NetworkMode::Testnet);

        assert_eq!(mainnet.network(), NetworkMode::Mainnet);
        assert_eq!(testnet.network(), NetworkMode::Testnet);
        assert_eq!(testnet.dealer_id(), Some("0xabc"));
        assert_ne!(mainnet.catalog_key(), testnet.catalog_key());
    }

    #[test]
    fn empty_dealer_id_is_dropped() {
        let cfg = CoreConfig::testnet().with_dealer_id(Some(String::new()));
        assert_eq!(cfg.dealer_id(), None);
    }

    #[test]
    fn core_config_parses_network_mode() {
        let cfg = app(Some("Testnet")).core_config().unwrap();
        assert_eq!(cfg.network(), NetworkMode::Testnet);
        assert_eq!(cfg.dealer_id(), Some("0xdealer"));

        assert_eq!(
            app(None).core_config().unwrap().network(),
            NetworkMode::Mainnet
        );
        assert!(app(Some("devnet")).core_config().is_err());
    }

    #[test]
    fn catalog_source_requires_file_or_endpoint() {
        assert!(app(None).catalog_source().is_err());

        let mut cfg = app(None);
        cfg.catalog_file = Some(PathBuf::from("catalog.yaml"));
        assert!(matches!(
            cfg.catalog_source().unwrap(),
            CatalogSourceConfig::File(_)
        ));
    }
}
