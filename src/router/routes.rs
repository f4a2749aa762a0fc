// Transfer requests and resolved plans
// This file defines the dispatch strategies and the per-request plan the
// pipeline resolves before any adapter is touched
//
// Numan Thabit 2025 Nov

use crate::catalog::{ChainDescriptor, SettlementRule, Token};
use crate::codec::InstructionKind;
use alloy_primitives::{Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferExt {
    /// Receiver for transfers into Starknet when no override is given.
    #[serde(default)]
    pub starknet_receiver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_chain: String,
    pub to_chain: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    /// Receiver override on the destination chain.
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub ext: Option<TransferExt>,
}

impl TransferRequest {
    pub fn new(
        from_chain: impl Into<String>,
        to_chain: impl Into<String>,
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_chain: from_chain.into(),
            to_chain: to_chain.into(),
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            amount,
            receiver: None,
            ext: None,
        }
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_ext(mut self, ext: TransferExt) -> Self {
        self.ext = Some(ext);
        self
    }

    /// Receiver override, ignoring blank values.
    pub fn receiver(&self) -> Option<&str> {
        self.receiver.as_deref().filter(|r| !r.trim().is_empty())
    }

    pub fn starknet_receiver(&self) -> Option<&str> {
        self.receiver().or_else(|| {
            self.ext
                .as_ref()
                .and_then(|ext| ext.starknet_receiver.as_deref())
                .filter(|r| !r.trim().is_empty())
        })
    }
}

/// Dispatch branch chosen for a request.
/// Direct send of a token amount on one chain, with no rule, routing code or memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub from_chain: String,
    pub to: String,
    /// Token name, symbol or contract address on `from_chain`.
    pub token: String,
    pub amount: Decimal,
}

impl RefundRequest {
    pub fn new(
        from_chain: impl Into<String>,
        to: impl Into<String>,
        token: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_chain: from_chain.into(),
            to: to.into(),
            token: token.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Same-VM router contract with an instruction payload.
    VmRouter,
    ZkLite,
    Loopring,
    Starknet,
    /// EVM source into Starknet through the source contract.
    ToStarknet,
    /// Plain native or ERC-20 transfer to the maker.
    Evm,
    ImmutableX,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::VmRouter => "vm_router",
            Strategy::ZkLite => "zk_lite",
            Strategy::Loopring => "loopring",
            Strategy::Starknet => "starknet",
            Strategy::ToStarknet => "to_starknet",
            Strategy::Evm => "evm",
            Strategy::ImmutableX => "immutable_x",
        }
    }

    /// Whether the maker identifies the transfer by the amount's routing code.
    pub fn carries_routing_code(&self) -> bool {
        !matches!(self, Strategy::VmRouter)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterInstruction {
    pub kind: InstructionKind,
    /// Contract the instruction is sent through.
    pub contract: String,
    pub data: Bytes,
}

/// Everything dispatch needs, resolved from the catalogs. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTransferPlan {
    pub request: TransferRequest,
    pub rule: SettlementRule,
    pub source: ChainDescriptor,
    pub destination: ChainDescriptor,
    pub source_token: Token,
    pub destination_token: Token,
    pub strategy: Strategy,
    /// On-chain amount in the source token's smallest unit.
    pub amount: U256,
    pub is_native: bool,
    /// Signer address the plan was resolved for.
    pub sender: String,
    pub instruction: Option<RouterInstruction>,
}

impl ResolvedTransferPlan {
    /// Maker settlement address on the source chain.
    pub fn maker(&self) -> &str {
        &self.rule.recipient
    }
}
