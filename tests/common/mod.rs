// Shared fixtures for integration tests
// A static catalog and recording spy adapters
//
// Numan Thabit 2025 Nov

#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use maker_bridge::adapters::{
    BatchEntry, EvmAdapter, EvmTx, ImxClient, ImxTransfer, LoopringAccount, LoopringTransfer,
    Receipt, RouterCall, StarknetAccount, StarknetTransfer, ZkLiteBatch, ZkLiteTransfer,
    ZkLiteWallet, ZkTxKind,
};
use maker_bridge::catalog::{ChainRegistry, RuleCatalog, StaticCatalog};
use maker_bridge::Router;
use std::sync::{Arc, Mutex};

pub const SENDER: &str = "0x9F1f3a9e2b3C4d5E6f708192a3B4c5D6e7F80912";
pub const MAKER: &str = "0x1111111111111111111111111111111111111111";
pub const ROUTER_GOERLI: &str = "0x00000000000000000000000000000000000000aa";
pub const SOURCE_GOERLI: &str = "0x00000000000000000000000000000000000000cc";
pub const USDC_GOERLI: &str = "0x07865c6E87B9F70255377e024ace6630C1Eaa37F";
pub const USDC_ARB_GOERLI: &str = "0x8FB1E3fC51F3b789dED7557E680551d93Ea9d892";
pub const USDC_IMX: &str = "0x3a4b1c7d2e5f60718293a4b5c6d7e8f901234567";
pub const STARKNET_MAKER: &str =
    "0x07b393627bd514d2aa4c83e9f0c468939df15ea3c29980cd8e7be3ec847795f0";
pub const STARKNET_ACCOUNT: &str =
    "0x0411c2f1a8ad4e2b1c0f7e5dfb3bbbd0c1cf9e6e2bd06a3b5c6e7f80912a3b4c";

pub const CATALOG_YAML: &str = r#"
chainList:
  - chainId: "5"
    internalId: 5
    networkId: "5"
    name: Goerli
    contract:
      router-v3: "0x00000000000000000000000000000000000000aa"
      source: "0x00000000000000000000000000000000000000cc"
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
    tokens:
      - { name: USD Coin, symbol: USDC, decimals: 6, address: "0x07865c6E87B9F70255377e024ace6630C1Eaa37F" }
  - chainId: "420"
    internalId: 77
    networkId: "420"
    name: Optimism Goerli
    routingCode: false
    contract:
      router-v3: "0x00000000000000000000000000000000000000bb"
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
    tokens:
      - { name: USD Coin, symbol: USDC, decimals: 6, address: "0x7E07E15D2a87A24492740D16f5bdF58c16db0c4E" }
  - chainId: "421613"
    internalId: 22
    networkId: "421613"
    name: Arbitrum Goerli
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
    tokens:
      - { name: USD Coin, symbol: USDC, decimals: 6, address: "0x8FB1E3fC51F3b789dED7557E680551d93Ea9d892" }
  - chainId: zksync_test
    internalId: 514
    networkId: zksync_test
    name: zkSync Lite Goerli
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
  - chainId: loopring_test
    internalId: 515
    networkId: loopring_test
    name: Loopring Goerli
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
  - chainId: SN_GOERLI
    internalId: 44
    networkId: SN_GOERLI
    name: Starknet Goerli
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7" }
  - chainId: immutableX_test
    internalId: 588
    networkId: immutableX_test
    name: Immutable X Goerli
    nativeCurrency: { name: Ether, symbol: ETH, decimals: 18, address: "0x0000000000000000000000000000000000000000" }
    tokens:
      - { name: USD Coin, symbol: USDC, decimals: 6, address: "0x3a4b1c7d2e5f60718293a4b5c6d7e8f901234567" }

ruleList:
  - line: 5/420-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "420", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
    withholdingFee: "0.0001"
    slippage: 50
  - line: 5/420-USDC/USDC
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "5", symbol: USDC, tokenAddress: "0x07865c6E87B9F70255377e024ace6630C1Eaa37F", decimals: 6, minPrice: "0.5", maxPrice: "1000" }
    toChain: { id: "420", symbol: USDC, tokenAddress: "0x7E07E15D2a87A24492740D16f5bdF58c16db0c4E", decimals: 6 }
    tradeFee: "0"
    withholdingFee: "0.3"
    slippage: 50
  - line: 5/420-ETH/USDC
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "420", symbol: USDC, tokenAddress: "0x7E07E15D2a87A24492740D16f5bdF58c16db0c4E", decimals: 6 }
    tradeFee: "1000"
    withholdingFee: "0.0001"
    slippage: 50
    rate: "1800"
  - line: 5/421613-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "421613", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: 421613/5-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "421613", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: 421613/5-USDC/USDC
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "421613", symbol: USDC, tokenAddress: "0x8FB1E3fC51F3b789dED7557E680551d93Ea9d892", decimals: 6, minPrice: "0.5", maxPrice: "1000" }
    toChain: { id: "5", symbol: USDC, tokenAddress: "0x07865c6E87B9F70255377e024ace6630C1Eaa37F", decimals: 6 }
    tradeFee: "0"
  - line: zksync_test/5-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: zksync_test, symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: loopring_test/5-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: loopring_test, symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: SN_GOERLI/5-ETH/ETH
    recipient: "0x07b393627bd514d2aa4c83e9f0c468939df15ea3c29980cd8e7be3ec847795f0"
    fromChain: { id: SN_GOERLI, symbol: ETH, tokenAddress: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: 5/SN_GOERLI-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: SN_GOERLI, symbol: ETH, tokenAddress: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7", decimals: 18 }
    tradeFee: "1000"
    slippage: 50
  - line: immutableX_test/5-ETH/ETH
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: immutableX_test, symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18, minPrice: "0.0005", maxPrice: "10" }
    toChain: { id: "5", symbol: ETH, tokenAddress: "0x0000000000000000000000000000000000000000", decimals: 18 }
    tradeFee: "1000"
  - line: immutableX_test/5-USDC/USDC
    recipient: "0x1111111111111111111111111111111111111111"
    fromChain: { id: immutableX_test, symbol: USDC, tokenAddress: "0x3a4b1c7d2e5f60718293a4b5c6d7e8f901234567", decimals: 6, minPrice: "0.5", maxPrice: "1000" }
    toChain: { id: "5", symbol: USDC, tokenAddress: "0x07865c6E87B9F70255377e024ace6630C1Eaa37F", decimals: 6 }
    tradeFee: "0"
"#;

pub fn catalog() -> StaticCatalog {
    StaticCatalog::from_yaml_str(CATALOG_YAML).expect("fixture catalog parses")
}

pub fn router() -> Router {
    let catalog = Arc::new(catalog());
    Router::new(
        Arc::new(ChainRegistry::new(catalog.clone())),
        Arc::new(RuleCatalog::new(catalog)),
    )
}

pub fn wei(n: u128) -> U256 {
    U256::from(n)
}

pub fn addr(raw: &str) -> Address {
    raw.parse().expect("valid address")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmCall {
    EstimateGas(EvmTx),
    Send(EvmTx),
    EstimateToken {
        token: Address,
        to: Address,
        amount: U256,
    },
    SendToken {
        token: Address,
        to: Address,
        amount: U256,
        gas_limit: Option<u64>,
    },
    Allowance {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Router {
        router: Address,
        call: RouterCall,
    },
}

pub struct SpyEvm {
    pub address: Address,
    pub chain_id: u64,
    pub gas_estimate: u64,
    pub calls: Mutex<Vec<EvmCall>>,
}

impl SpyEvm {
    pub fn new(chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            address: addr(SENDER),
            chain_id,
            gas_estimate: 30_000,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_gas(chain_id: u64, gas_estimate: u64) -> Arc<Self> {
        Arc::new(Self {
            address: addr(SENDER),
            chain_id,
            gas_estimate,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<EvmCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EvmCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EvmAdapter for SpyEvm {
    fn address(&self) -> Address {
        self.address
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn estimate_gas(&self, tx: &EvmTx) -> Result<u64> {
        self.record(EvmCall::EstimateGas(tx.clone()));
        Ok(self.gas_estimate)
    }

    async fn send_transaction(&self, tx: EvmTx) -> Result<Receipt> {
        self.record(EvmCall::Send(tx));
        Ok(Receipt::new("0xnative"))
    }

    async fn estimate_token_transfer(&self, token: Address, to: Address, amount: U256) -> Result<u64> {
        self.record(EvmCall::EstimateToken { token, to, amount });
        Ok(self.gas_estimate)
    }

    async fn send_token_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
        gas_limit: Option<u64>,
    ) -> Result<Receipt> {
        self.record(EvmCall::SendToken {
            token,
            to,
            amount,
            gas_limit,
        });
        Ok(Receipt::new("0xtoken"))
    }

    async fn ensure_allowance(&self, token: Address, spender: Address, amount: U256) -> Result<()> {
        self.record(EvmCall::Allowance {
            token,
            spender,
            amount,
        });
        Ok(())
    }

    async fn call_router(&self, router: Address, call: RouterCall) -> Result<Receipt> {
        self.record(EvmCall::Router { router, call });
        Ok(Receipt::new("0xrouter"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZkCall {
    Transfer(ZkLiteTransfer),
    Batch(ZkLiteBatch),
}

pub struct SpyZkLite {
    pub key_set: bool,
    pub account_id: Option<u64>,
    pub calls: Mutex<Vec<ZkCall>>,
}

impl SpyZkLite {
    pub fn new(key_set: bool, account_id: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            key_set,
            account_id,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ZkCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZkLiteWallet for SpyZkLite {
    async fn is_signing_key_set(&self) -> Result<bool> {
        Ok(self.key_set)
    }

    async fn account_id(&self) -> Result<Option<u64>> {
        Ok(self.account_id)
    }

    async fn transfer(&self, transfer: ZkLiteTransfer) -> Result<Receipt> {
        self.calls.lock().unwrap().push(ZkCall::Transfer(transfer));
        Ok(Receipt::new("sync-tx:transfer"))
    }

    async fn submit_batch(&self, batch: ZkLiteBatch) -> Result<Vec<BatchEntry>> {
        self.calls.lock().unwrap().push(ZkCall::Batch(batch));
        Ok(vec![
            BatchEntry {
                kind: ZkTxKind::ChangePubKey,
                receipt: Receipt::new("sync-tx:change-pubkey"),
            },
            BatchEntry {
                kind: ZkTxKind::Transfer,
                receipt: Receipt::new("sync-tx:batched-transfer"),
            },
        ])
    }
}

pub struct SpyLoopring {
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<LoopringTransfer>>,
}

impl SpyLoopring {
    pub fn new(fail_with: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            fail_with: fail_with.map(str::to_string),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<LoopringTransfer> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoopringAccount for SpyLoopring {
    async fn send_transfer(&self, transfer: LoopringTransfer) -> Result<Receipt> {
        self.calls.lock().unwrap().push(transfer);
        match &self.fail_with {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(Receipt::new("loopring-hash")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSend {
    pub token: String,
    pub to: String,
    pub amount: U256,
}

pub struct SpyStarknet {
    pub address: String,
    pub calls: Mutex<Vec<StarknetTransfer>>,
    pub sends: Mutex<Vec<TokenSend>>,
}

impl SpyStarknet {
    pub fn new(address: &str) -> Arc<Self> {
        Arc::new(Self {
            address: address.to_string(),
            calls: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<StarknetTransfer> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<TokenSend> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl StarknetAccount for SpyStarknet {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn execute_transfer(&self, transfer: StarknetTransfer) -> Result<Receipt> {
        self.calls.lock().unwrap().push(transfer);
        Ok(Receipt::new("0xstarknet"))
    }

    async fn transfer_token(&self, token: &str, to: &str, amount: U256) -> Result<Receipt> {
        self.sends.lock().unwrap().push(TokenSend {
            token: token.to_string(),
            to: to.to_string(),
            amount,
        });
        Ok(Receipt::new("0xstarknet-send"))
    }
}

pub struct SpyImx {
    pub calls: Mutex<Vec<ImxTransfer>>,
}

impl SpyImx {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ImxTransfer> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImxClient for SpyImx {
    async fn transfer(&self, transfer: ImxTransfer) -> Result<Receipt> {
        self.calls.lock().unwrap().push(transfer);
        Ok(Receipt::new("imx-transfer"))
    }
}
