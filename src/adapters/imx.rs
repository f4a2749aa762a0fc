// Immutable X client contract
//
// Numan Thabit 2025 Nov

use super::Receipt;
use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImxToken {
    Eth {
        decimals: u8,
    },
    Erc20 {
        symbol: String,
        decimals: u8,
        token_address: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImxTransfer {
    pub sender: String,
    pub token: ImxToken,
    pub quantity: U256,
    pub receiver: String,
}

#[async_trait]
pub trait ImxClient: Send + Sync {
    async fn transfer(&self, transfer: ImxTransfer) -> Result<Receipt>;
}
