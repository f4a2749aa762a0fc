// Chain adapter contracts
// The core never talks to a chain directly; every on-chain action goes
// through one of these traits, implemented by the embedding application
//
// Numan Thabit 2025 Nov

pub mod evm;
pub mod imx;
pub mod loopring;
pub mod starknet;
pub mod zklite;

pub use evm::{EvmAdapter, EvmTx, RouterCall};
pub use imx::{ImxClient, ImxToken, ImxTransfer};
pub use loopring::{LoopringAccount, LoopringTransfer};
pub use starknet::{StarknetAccount, StarknetTransfer};
pub use zklite::{BatchEntry, ZkLiteBatch, ZkLiteTransfer, ZkLiteWallet, ZkTxKind};

use crate::errors::{fail, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Raw result of an on-chain submission, handed back to the caller unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub hash: Option<String>,
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl Receipt {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Who signs the transfer.
#[derive(Clone)]
pub enum SignerIdentity {
    Evm(Arc<dyn EvmAdapter>),
    Starknet(Arc<dyn StarknetAccount>),
}

impl fmt::Debug for SignerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerIdentity::Evm(adapter) => write!(f, "Evm({})", adapter.address()),
            SignerIdentity::Starknet(account) => write!(f, "Starknet({})", account.address()),
        }
    }
}

/// Signer plus the family-specific clients a request may need.
#[derive(Clone)]
pub struct AdapterSet {
    signer: SignerIdentity,
    zk_lite: Option<Arc<dyn ZkLiteWallet>>,
    loopring: Option<Arc<dyn LoopringAccount>>,
    imx: Option<Arc<dyn ImxClient>>,
}

impl AdapterSet {
    pub fn evm(adapter: Arc<dyn EvmAdapter>) -> Self {
        Self::new(SignerIdentity::Evm(adapter))
    }

    pub fn starknet(account: Arc<dyn StarknetAccount>) -> Self {
        Self::new(SignerIdentity::Starknet(account))
    }

    pub fn new(signer: SignerIdentity) -> Self {
        Self {
            signer,
            zk_lite: None,
            loopring: None,
            imx: None,
        }
    }

    pub fn with_zk_lite(mut self, wallet: Arc<dyn ZkLiteWallet>) -> Self {
        self.zk_lite = Some(wallet);
        self
    }

    pub fn with_loopring(mut self, account: Arc<dyn LoopringAccount>) -> Self {
        self.loopring = Some(account);
        self
    }

    pub fn with_imx(mut self, client: Arc<dyn ImxClient>) -> Self {
        self.imx = Some(client);
        self
    }

    pub fn signer(&self) -> &SignerIdentity {
        &self.signer
    }

    /// Address of the signer in its own chain's format.
    pub fn signer_address(&self) -> String {
        match &self.signer {
            SignerIdentity::Evm(adapter) => adapter.address().to_checksum(None),
            SignerIdentity::Starknet(account) => account.address(),
        }
    }

    pub fn evm_signer(&self) -> Result<&Arc<dyn EvmAdapter>> {
        match &self.signer {
            SignerIdentity::Evm(adapter) => Ok(adapter),
            SignerIdentity::Starknet(_) => {
                fail(ErrorKind::SignerMismatch, "an EVM signer is required")
            }
        }
    }

    pub fn starknet_signer(&self) -> Result<&Arc<dyn StarknetAccount>> {
        match &self.signer {
            SignerIdentity::Starknet(account) => Ok(account),
            SignerIdentity::Evm(_) => {
                fail(ErrorKind::SignerMismatch, "a Starknet account is required")
            }
        }
    }

    pub fn zk_lite(&self) -> Result<&Arc<dyn ZkLiteWallet>> {
        self.zk_lite
            .as_ref()
            .map_or_else(|| fail(ErrorKind::MissingField, "zkSync Lite wallet is not configured"), Ok)
    }

    pub fn loopring(&self) -> Result<&Arc<dyn LoopringAccount>> {
        self.loopring
            .as_ref()
            .map_or_else(|| fail(ErrorKind::MissingField, "Loopring account is not configured"), Ok)
    }

    pub fn imx(&self) -> Result<&Arc<dyn ImxClient>> {
        self.imx
            .as_ref()
            .map_or_else(|| fail(ErrorKind::MissingField, "Immutable X client is not configured"), Ok)
    }
}
