// EVM adapter contract
// Native sends, ERC-20 transfers and router contract calls
//
// Numan Thabit 2025 Nov

use super::Receipt;
use alloy_primitives::{Address, Bytes, U256};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTx {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub gas_limit: Option<u64>,
}

/// Calls on the router contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    /// Native value forwarded to `to` with the instruction payload.
    Transfer { to: Address, data: Bytes, value: U256 },
    /// ERC-20 amount pulled from the signer and forwarded to `to`.
    TransferToken {
        token: Address,
        to: Address,
        amount: U256,
        data: Bytes,
    },
}

#[async_trait]
pub trait EvmAdapter: Send + Sync {
    fn address(&self) -> Address;

    async fn chain_id(&self) -> Result<u64>;

    async fn estimate_gas(&self, tx: &EvmTx) -> Result<u64>;

    async fn send_transaction(&self, tx: EvmTx) -> Result<Receipt>;

    async fn estimate_token_transfer(&self, token: Address, to: Address, amount: U256)
        -> Result<u64>;

    async fn send_token_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
        gas_limit: Option<u64>,
    ) -> Result<Receipt>;

    /// Approve `spender` for at least `amount` when the current allowance is lower.
    async fn ensure_allowance(&self, token: Address, spender: Address, amount: U256) -> Result<()>;

    async fn call_router(&self, router: Address, call: RouterCall) -> Result<Receipt>;
}
