// Loopring account contract
//
// Numan Thabit 2025 Nov

use super::Receipt;
use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopringTransfer {
    pub from: String,
    pub chain_id: String,
    pub to: String,
    pub token: String,
    pub amount: U256,
    /// Routing memo identifying the destination chain.
    pub memo: String,
}

#[async_trait]
pub trait LoopringAccount: Send + Sync {
    async fn send_transfer(&self, transfer: LoopringTransfer) -> Result<Receipt>;
}
