// JSON-RPC transport layer implementation
// This file implements the JSON-RPC client that fetches chain and
// settlement rule catalogs from the maker OpenAPI service
//
// Numan Thabit 2025 Nov

use crate::catalog::{ChainDescriptor, ChainSource, RuleSource, SettlementRule};
use crate::config::NetworkMode;
use crate::errors::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

pub const TRADING_PAIRS_METHOD: &str = "orbiter_getTradingPairs";

#[derive(Debug, Clone)]
pub struct OpenApiClient {
    http: Client,
    mainnet: Url,
    testnet: Option<Url>,
}

impl OpenApiClient {
    pub fn new(mainnet: Url, testnet: Option<Url>) -> Self {
        Self {
            http: Client::new(),
            mainnet,
            testnet,
        }
    }

    pub fn endpoint(&self, network: NetworkMode) -> Option<&Url> {
        match network {
            NetworkMode::Mainnet => Some(&self.mainnet),
            NetworkMode::Testnet => self.testnet.as_ref(),
        }
    }

    pub async fn trading_pairs(
        &self,
        network: NetworkMode,
        dealer_id: Option<&str>,
    ) -> Result<TradingPairs, TransportError> {
        let url = self
            .endpoint(network)
            .ok_or_else(|| TransportError::Provider(format!("no {network} endpoint configured")))?;
        let params = match dealer_id {
            Some(dealer) => json!([dealer]),
            None => json!([]),
        };
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": TRADING_PAIRS_METHOD,
            "params": params,
        });
        let resp = self
            .http
            .post(url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Transport(format!("jsonrpc send: {e}")))?;
        if !resp.status().is_success() {
            return Err(TransportError::Provider(format!("http {}", resp.status())));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TransportError::Transport(format!("json parse: {e}")))?;
        if let Some(err) = body.get("error") {
            return Err(TransportError::Provider(err.to_string()));
        }
        let pairs: TradingPairs = serde_json::from_value(body["result"].clone())
            .map_err(|e| TransportError::Provider(format!("decode result: {e}")))?;
        debug!(
            %network,
            chains = pairs.chain_list.len(),
            rules = pairs.rule_list.len(),
            "fetched trading pairs"
        );
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPairs {
    #[serde(default)]
    pub chain_list: Vec<ChainDescriptor>,
    #[serde(default)]
    pub rule_list: Vec<SettlementRule>,
}

#[async_trait]
impl ChainSource for OpenApiClient {
    async fn list_chains(&self, network: NetworkMode) -> anyhow::Result<Vec<ChainDescriptor>> {
        Ok(self.trading_pairs(network, None).await?.chain_list)
    }
}

#[async_trait]
impl RuleSource for OpenApiClient {
    async fn list_rules(
        &self,
        network: NetworkMode,
        dealer_id: Option<&str>,
    ) -> anyhow::Result<Vec<SettlementRule>> {
        Ok(self.trading_pairs(network, dealer_id).await?.rule_list)
    }
}
