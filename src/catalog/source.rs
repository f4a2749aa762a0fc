// Catalog sources
// Traits the catalogs load through, plus a static YAML/JSON source
//
// Numan Thabit 2025 Nov

use super::chains::ChainDescriptor;
use super::rules::SettlementRule;
use crate::config::NetworkMode;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn list_chains(&self, network: NetworkMode) -> Result<Vec<ChainDescriptor>>;
}

#[async_trait]
pub trait RuleSource: Send + Sync {
    async fn list_rules(
        &self,
        network: NetworkMode,
        dealer_id: Option<&str>,
    ) -> Result<Vec<SettlementRule>>;
}

/// Chains and rules held in memory, typically read from a file.
///
/// The same document is served for every network mode and dealer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticCatalog {
    #[serde(default)]
    pub chain_list: Vec<ChainDescriptor>,
    #[serde(default)]
    pub rule_list: Vec<SettlementRule>,
}

impl StaticCatalog {
    pub fn new(chain_list: Vec<ChainDescriptor>, rule_list: Vec<SettlementRule>) -> Self {
        Self {
            chain_list,
            rule_list,
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("invalid YAML catalog")
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid JSON catalog")
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog file {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_yaml_str(&raw),
        }
    }
}

#[async_trait]
impl ChainSource for StaticCatalog {
    async fn list_chains(&self, _network: NetworkMode) -> Result<Vec<ChainDescriptor>> {
        Ok(self.chain_list.clone())
    }
}

#[async_trait]
impl RuleSource for StaticCatalog {
    async fn list_rules(
        &self,
        _network: NetworkMode,
        _dealer_id: Option<&str>,
    ) -> Result<Vec<SettlementRule>> {
        Ok(self.rule_list.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_an_empty_catalog() {
        let catalog = StaticCatalog::from_yaml_str("{}").unwrap();
        assert!(catalog.chain_list.is_empty());
        assert!(catalog.rule_list.is_empty());
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(StaticCatalog::from_json_str("{\"chainList\": 3}").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = StaticCatalog::load(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.yaml"));
    }
}
