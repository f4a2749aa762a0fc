// Starknet account contract
//
// Numan Thabit 2025 Nov

use super::Receipt;
use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarknetTransfer {
    /// Receiver on the destination chain, forwarded to the maker.
    pub l1_receiver: String,
    pub token: String,
    pub maker: String,
    pub amount: U256,
    pub chain_id: String,
}

#[async_trait]
pub trait StarknetAccount: Send + Sync {
    fn address(&self) -> String;

    async fn execute_transfer(&self, transfer: StarknetTransfer) -> Result<Receipt>;

    /// Plain ERC-20 `transfer` of `amount` from the account to `to`.
    async fn transfer_token(&self, token: &str, to: &str, amount: U256) -> Result<Receipt>;
}
