// zkSync Lite wallet contract
//
// Numan Thabit 2025 Nov

use super::Receipt;
use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZkLiteTransfer {
    pub to: String,
    pub token: String,
    pub amount: U256,
}

/// Signing-key registration followed by the transfer, submitted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZkLiteBatch {
    pub account_id: u64,
    pub transfer: ZkLiteTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZkTxKind {
    ChangePubKey,
    Transfer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub kind: ZkTxKind,
    pub receipt: Receipt,
}

#[async_trait]
pub trait ZkLiteWallet: Send + Sync {
    async fn is_signing_key_set(&self) -> Result<bool>;

    /// `None` when the account has no balance history yet.
    async fn account_id(&self) -> Result<Option<u64>>;

    /// Nearest amount representable in the network's packed format.
    fn closest_packable_amount(&self, amount: U256) -> U256 {
        amount
    }

    async fn transfer(&self, transfer: ZkLiteTransfer) -> Result<Receipt>;

    async fn submit_batch(&self, batch: ZkLiteBatch) -> Result<Vec<BatchEntry>>;
}
