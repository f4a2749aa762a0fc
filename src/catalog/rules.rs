// Settlement rule catalog
// Market-maker rules keyed by chain pair and token pair
//
// Numan Thabit 2025 Nov

use super::chains::ChainDescriptor;
use super::serde_helpers::{string_or_number, u64_from_string_or_number};
use super::source::RuleSource;
use super::Snapshot;
use crate::config::CoreConfig;
use crate::errors::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Canonical pair key: `{srcChainId}/{dstChainId}-{srcSymbol}/{dstSymbol}`.
pub fn pair_key(src_chain: &str, dst_chain: &str, src_symbol: &str, dst_symbol: &str) -> String {
    format!("{src_chain}/{dst_chain}-{src_symbol}/{dst_symbol}")
}

/// One side of a settlement rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleLeg {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub symbol: String,
    pub token_address: String,
    pub decimals: u8,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRule {
    #[serde(default)]
    pub line: String,
    /// Maker settlement address on the source chain.
    pub recipient: String,
    pub from_chain: RuleLeg,
    pub to_chain: RuleLeg,
    /// Parts per million of the transferred amount.
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub trade_fee: u64,
    /// Flat fee in source-token units.
    #[serde(default)]
    pub withholding_fee: Decimal,
    /// Basis points.
    #[serde(default)]
    pub slippage: Option<u32>,
    /// Destination units per source unit.
    #[serde(default)]
    pub rate: Option<Decimal>,
}

impl SettlementRule {
    /// Pair key of this rule; derived from the legs when `line` is empty.
    pub fn key(&self) -> String {
        if self.line.is_empty() {
            pair_key(
                &self.from_chain.id,
                &self.to_chain.id,
                &self.from_chain.symbol,
                &self.to_chain.symbol,
            )
        } else {
            self.line.clone()
        }
    }

    pub fn min_amount(&self) -> Decimal {
        self.from_chain.min_price.unwrap_or(Decimal::ZERO)
    }

    pub fn max_amount(&self) -> Option<Decimal> {
        self.from_chain.max_price
    }
}

pub struct RuleCatalog {
    source: Arc<dyn RuleSource>,
    snapshot: Snapshot<SettlementRule>,
}

impl RuleCatalog {
    pub fn new(source: Arc<dyn RuleSource>) -> Self {
        Self {
            source,
            snapshot: Snapshot::new("rules"),
        }
    }

    pub async fn rules(&self, config: &CoreConfig) -> Result<Arc<Vec<SettlementRule>>> {
        let network = config.network();
        self.snapshot
            .get_or_load(&config.catalog_key(), || {
                self.source.list_rules(network, config.dealer_id())
            })
            .await
    }

    /// First rule whose pair key matches; `None` when nothing does.
    pub async fn find_rule(
        &self,
        config: &CoreConfig,
        source: &ChainDescriptor,
        destination: &ChainDescriptor,
        source_symbol: &str,
        destination_symbol: &str,
    ) -> Result<Option<SettlementRule>> {
        if source_symbol.is_empty() || destination_symbol.is_empty() {
            return Ok(None);
        }
        let key = pair_key(
            &source.chain_id,
            &destination.chain_id,
            source_symbol,
            destination_symbol,
        );
        let rules = self.rules(config).await?;
        let found = rules.iter().find(|r| r.key() == key).cloned();
        debug!(%key, matched = found.is_some(), "rule lookup");
        Ok(found)
    }

    pub async fn invalidate(&self) {
        self.snapshot.invalidate().await;
    }
}
