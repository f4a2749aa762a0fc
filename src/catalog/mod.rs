// Catalog module - chain descriptors, tokens and settlement rules
// This file holds the lazily loaded, read-mostly snapshot shared by
// concurrent transfer requests
//
// Numan Thabit 2025 Nov

pub mod chains;
pub mod rules;
pub mod source;

pub use chains::{ChainDescriptor, ChainFamily, ChainRegistry, Token};
pub use rules::{pair_key, RuleCatalog, RuleLeg, SettlementRule};
pub use source::{ChainSource, RuleSource, StaticCatalog};

use crate::config::CatalogKey;
use crate::errors::{ErrorKind, Result, ResultExt};
use crate::metrics::CATALOG_LOADS;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cached catalog contents tagged with the configuration they were loaded for.
pub(crate) struct Snapshot<T> {
    name: &'static str,
    inner: RwLock<Option<(CatalogKey, Arc<Vec<T>>)>>,
}

impl<T> Snapshot<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(None),
        }
    }

    /// Return the snapshot for `key`, loading it when absent or loaded for a
    /// different key. Empty results are handed out but not retained.
    pub(crate) async fn get_or_load<F, Fut>(&self, key: &CatalogKey, load: F) -> Result<Arc<Vec<T>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<T>>>,
    {
        if let Some((cached_key, items)) = &*self.inner.read().await {
            if cached_key == key {
                return Ok(Arc::clone(items));
            }
        }

        let mut guard = self.inner.write().await;
        if let Some((cached_key, items)) = &*guard {
            if cached_key == key {
                return Ok(Arc::clone(items));
            }
        }

        let loaded = load().await;
        let outcome = if loaded.is_ok() { "ok" } else { "error" };
        CATALOG_LOADS.with_label_values(&[self.name, outcome]).inc();
        let items = Arc::new(loaded.or_fail(
            ErrorKind::Catalog,
            format!("{} catalog init failed", self.name),
        )?);

        debug!(
            catalog = self.name,
            network = %key.network,
            dealer = ?key.dealer_id,
            entries = items.len(),
            "catalog snapshot loaded"
        );

        *guard = if items.is_empty() {
            None
        } else {
            Some((key.clone(), Arc::clone(&items)))
        };
        Ok(items)
    }

    pub(crate) async fn invalidate(&self) {
        *self.inner.write().await = None;
    }
}

/// Catalog APIs send ids and fees either as JSON strings or numbers.
pub(crate) mod serde_helpers {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
        })
    }

    pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) if s.trim().is_empty() => Ok(0),
            StringOrNumber::String(s) => s.trim().parse().map_err(de::Error::custom),
            StringOrNumber::Unsigned(n) => Ok(n),
            StringOrNumber::Signed(n) => u64::try_from(n).map_err(de::Error::custom),
        }
    }
}
