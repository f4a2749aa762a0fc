// Chain catalog
// Chain descriptors, token metadata and the cached chain registry
//
// Numan Thabit 2025 Nov

use super::serde_helpers::string_or_number;
use super::source::ChainSource;
use super::Snapshot;
use crate::config::CoreConfig;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Contract type of the same-VM router contract.
pub const CONTRACT_ROUTER_V3: &str = "router-v3";
/// Contract type used for transfers into Starknet.
pub const CONTRACT_SOURCE: &str = "source";

/// Transfer protocol family a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainFamily {
    Evm,
    /// zkSync Lite: balance-indexed accounts, batch-signed key changes.
    ZkLite,
    /// Loopring: memo-tagged transfers.
    Loopring,
    /// Starknet account contracts.
    Starknet,
    /// Immutable X client transfers.
    ImmutableX,
}

impl ChainFamily {
    pub fn of(chain_id: &str) -> Self {
        match chain_id {
            "zksync" | "zksync_test" => ChainFamily::ZkLite,
            "loopring" | "loopring_test" => ChainFamily::Loopring,
            "SN_MAIN" | "SN_GOERLI" | "SN_SEPOLIA" => ChainFamily::Starknet,
            "immutableX" | "immutableX_test" => ChainFamily::ImmutableX,
            _ => ChainFamily::Evm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default)]
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub address: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    #[serde(deserialize_with = "string_or_number")]
    pub chain_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub internal_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub network_id: String,
    pub name: String,
    /// Contract addresses keyed by logical contract type.
    #[serde(default)]
    pub contract: BTreeMap<String, String>,
    pub native_currency: Token,
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Whether the market maker identifies transfers into this chain by the
    /// routing code carried in the amount's trailing digits.
    #[serde(default = "default_true")]
    pub routing_code: bool,
    /// Overrides the family derived from `chain_id`.
    #[serde(default)]
    pub family: Option<ChainFamily>,
}

impl ChainDescriptor {
    pub fn family(&self) -> ChainFamily {
        self.family.unwrap_or_else(|| ChainFamily::of(&self.chain_id))
    }

    pub fn contract_address(&self, kind: &str) -> Option<&str> {
        self.contract
            .get(kind)
            .map(String::as_str)
            .filter(|addr| !addr.is_empty())
    }

    /// Numeric chain id for EVM-style chains.
    pub fn numeric_chain_id(&self) -> Option<u64> {
        self.chain_id.parse().ok()
    }

    /// Matches a user-supplied chain reference against any of the three ids.
    pub fn matches_id(&self, id: &str) -> bool {
        self.chain_id == id || self.internal_id == id || self.network_id == id
    }

    pub fn is_native_token(&self, address: &str) -> bool {
        address.eq_ignore_ascii_case(&self.native_currency.address) || is_zero_address(address)
    }

    /// Token on this chain by contract address, including the native currency.
    pub fn token_by_address(&self, address: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(address))
            .or_else(|| {
                self.is_native_token(address)
                    .then_some(&self.native_currency)
            })
    }

    /// Token on this chain by name, symbol or address.
    pub fn token(&self, query: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .chain(std::iter::once(&self.native_currency))
            .find(|t| t.name == query || t.symbol == query || t.address.eq_ignore_ascii_case(query))
    }
}

fn is_zero_address(address: &str) -> bool {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    !digits.is_empty() && digits.len() >= 40 && digits.bytes().all(|b| b == b'0')
}

/// Cached view over a [`ChainSource`].
pub struct ChainRegistry {
    source: Arc<dyn ChainSource>,
    snapshot: Snapshot<ChainDescriptor>,
}

impl ChainRegistry {
    pub fn new(source: Arc<dyn ChainSource>) -> Self {
        Self {
            source,
            snapshot: Snapshot::new("chains"),
        }
    }

    pub async fn chains(&self, config: &CoreConfig) -> Result<Arc<Vec<ChainDescriptor>>> {
        let network = config.network();
        self.snapshot
            .get_or_load(&config.catalog_key(), || self.source.list_chains(network))
            .await
    }

    /// Look a chain up by chain id, internal id or network id.
    pub async fn chain(&self, config: &CoreConfig, id: &str) -> Result<Option<ChainDescriptor>> {
        let chains = self.chains(config).await?;
        Ok(chains.iter().find(|c| c.matches_id(id)).cloned())
    }

    pub async fn tokens(&self, config: &CoreConfig, chain: &str) -> Result<Vec<Token>> {
        Ok(self
            .chain(config, chain)
            .await?
            .map(|c| c.tokens)
            .unwrap_or_default())
    }

    pub async fn token(&self, config: &CoreConfig, chain: &str, query: &str) -> Result<Option<Token>> {
        Ok(self
            .chain(config, chain)
            .await?
            .and_then(|c| c.token(query).cloned()))
    }

    pub async fn token_decimals(
        &self,
        config: &CoreConfig,
        chain: &str,
        query: &str,
    ) -> Result<Option<u8>> {
        Ok(self.token(config, chain, query).await?.map(|t| t.decimals))
    }

    /// Drop the cached snapshot; the next lookup reloads it.
    pub async fn invalidate(&self) {
        self.snapshot.invalidate().await;
    }
}
