// Dispatch execution
// This file turns a resolved plan into adapter calls, one branch per
// strategy, and records dispatch outcome and latency
//
// Numan Thabit 2025 Nov

use super::routes::{ResolvedTransferPlan, Strategy};
use super::validation::{
    is_starknet_account, parse_evm_address, require, require_text, MIN_STARKNET_ENDPOINT_LEN,
};
use crate::adapters::{
    AdapterSet, EvmAdapter, EvmTx, ImxToken, ImxTransfer, LoopringTransfer, Receipt, RouterCall,
    StarknetTransfer, ZkLiteBatch, ZkLiteTransfer, ZkTxKind,
};
use crate::catalog::{ChainDescriptor, ChainFamily, Token};
use crate::codec::routing_memo;
use crate::errors::{
    fail, translate_adapter_message, BridgeError, ErrorKind, Result, LOOPRING_ERROR_MESSAGES,
};
use crate::metrics::{DISPATCH_LATENCY, DISPATCH_TOTAL};
use alloy_primitives::{Address, Bytes, U256};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Gas estimates below this are raised to it on chains known to under-estimate.
pub const MIN_TRANSFER_GAS: u64 = 21_000;
/// Arbitrum One, Arbitrum Goerli, Arbitrum Sepolia.
const GAS_FLOOR_CHAINS: &[&str] = &["42161", "421613", "421614"];

pub fn apply_gas_floor(chain: &ChainDescriptor, estimate: u64) -> u64 {
    if GAS_FLOOR_CHAINS.contains(&chain.chain_id.as_str()) && estimate < MIN_TRANSFER_GAS {
        MIN_TRANSFER_GAS
    } else {
        estimate
    }
}

fn adapter_error(message: &'static str) -> impl FnOnce(anyhow::Error) -> BridgeError {
    move |cause| BridgeError::adapter(message, cause)
}

/// Run the plan's branch. The adapter result is returned unmodified.
pub async fn execute(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let dispatch = async {
        match plan.strategy {
            Strategy::VmRouter => router_transfer(plan, adapters).await,
            Strategy::ToStarknet => router_transfer(plan, adapters).await,
            Strategy::ZkLite => zk_lite_transfer(plan, adapters).await,
            Strategy::Loopring => loopring_transfer(plan, adapters).await,
            Strategy::Starknet => starknet_transfer(plan, adapters).await,
            Strategy::Evm => evm_transfer(plan, adapters).await,
            Strategy::ImmutableX => imx_transfer(plan, adapters).await,
        }
    };
    observe(plan.strategy.as_str(), plan.amount, dispatch).await
}

/// Send `amount` of `token` to `to` on `chain` as a plain transfer.
///
/// Loopring sources go through the Loopring account with an empty memo,
/// Starknet sources through the Starknet account, EVM sources through the
/// EVM signer with the same gas handling as [`execute`].
pub async fn refund(
    chain: &ChainDescriptor,
    token: &Token,
    to: &str,
    amount: U256,
    adapters: &AdapterSet,
) -> Result<Receipt> {
    observe("refund", amount, send_direct(chain, token, to, amount, adapters)).await
}

async fn send_direct(
    chain: &ChainDescriptor,
    token: &Token,
    to: &str,
    amount: U256,
    adapters: &AdapterSet,
) -> Result<Receipt> {
    match chain.family() {
        ChainFamily::Evm => {
            let evm = adapters.evm_signer()?;
            let to = parse_evm_address(to, "refund receiver")?;
            let token_address = if chain.is_native_token(&token.address) {
                None
            } else {
                Some(parse_evm_address(&token.address, "refund token")?)
            };
            evm_send(evm, chain, to, token_address, amount).await
        }
        ChainFamily::Loopring => {
            loopring_send(adapters, chain, to, &token.address, amount, String::new()).await
        }
        ChainFamily::Starknet => {
            let account = adapters.starknet_signer()?;
            if !is_starknet_account(&account.address()) {
                return fail(ErrorKind::InvalidAddress, "Please check your starknet address.");
            }
            account
                .transfer_token(&token.address, to, amount)
                .await
                .map_err(adapter_error("starknet refund error"))
        }
        ChainFamily::ZkLite | ChainFamily::ImmutableX => fail(
            ErrorKind::UnsupportedAccountState,
            format!("refunds from {} are not supported", chain.name),
        ),
    }
}

/// Record outcome and latency of one dispatch under `label`.
async fn observe<F>(label: &'static str, amount: U256, dispatch: F) -> Result<Receipt>
where
    F: Future<Output = Result<Receipt>>,
{
    let timer = DISPATCH_LATENCY.with_label_values(&[label]).start_timer();
    let result = dispatch.await;
    let elapsed = timer.stop_and_record();
    let outcome = if result.is_ok() { "ok" } else { "error" };
    DISPATCH_TOTAL.with_label_values(&[label, outcome]).inc();

    match &result {
        Ok(receipt) => info!(
            strategy = label,
            hash = ?receipt.hash,
            %amount,
            elapsed_ms = elapsed * 1000.0,
            "transfer dispatched"
        ),
        Err(err) => warn!(
            strategy = label,
            kind = %err.kind(),
            error = %err,
            cause = ?err.cause(),
            "transfer dispatch failed"
        ),
    }
    result
}

/// Send through a router contract with the plan's instruction payload.
async fn router_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let evm = adapters.evm_signer()?;
    let instruction = require(
        plan.instruction.as_ref(),
        ErrorKind::MissingField,
        "router transfer requires an instruction",
    )?;
    let router = parse_evm_address(&instruction.contract, "router contract")?;
    let maker = parse_evm_address(plan.maker(), "maker")?;
    let data = instruction.data.clone();

    let call = if plan.is_native {
        RouterCall::Transfer {
            to: maker,
            data,
            value: plan.amount,
        }
    } else {
        let token = parse_evm_address(&plan.rule.from_chain.token_address, "source token")?;
        evm.ensure_allowance(token, router, plan.amount)
            .await
            .map_err(adapter_error("router token approval failed"))?;
        RouterCall::TransferToken {
            token,
            to: maker,
            amount: plan.amount,
            data,
        }
    };
    debug!(kind = ?instruction.kind, %router, "calling router contract");
    evm.call_router(router, call)
        .await
        .map_err(adapter_error("router transfer error"))
}

async fn evm_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let evm = adapters.evm_signer()?;
    let maker = parse_evm_address(plan.maker(), "maker")?;
    let token = if plan.is_native {
        None
    } else {
        Some(parse_evm_address(&plan.rule.from_chain.token_address, "source token")?)
    };
    evm_send(evm, &plan.source, maker, token, plan.amount).await
}

/// Native send when `token` is `None`, ERC-20 `transfer` otherwise.
async fn evm_send(
    evm: &Arc<dyn EvmAdapter>,
    chain: &ChainDescriptor,
    to: Address,
    token: Option<Address>,
    amount: U256,
) -> Result<Receipt> {
    match token {
        None => {
            let tx = EvmTx {
                from: evm.address(),
                to,
                value: amount,
                data: Bytes::new(),
                gas_limit: None,
            };
            let estimate = evm
                .estimate_gas(&tx)
                .await
                .map_err(adapter_error("evm gas estimation failed"))?;
            let gas_limit = apply_gas_floor(chain, estimate);
            evm.send_transaction(EvmTx {
                gas_limit: Some(gas_limit),
                ..tx
            })
            .await
            .map_err(adapter_error("evm transfer error"))
        }
        Some(token) => {
            let estimate = evm
                .estimate_token_transfer(token, to, amount)
                .await
                .map_err(adapter_error("evm gas estimation failed"))?;
            let gas_limit = apply_gas_floor(chain, estimate);
            evm.send_token_transfer(token, to, amount, Some(gas_limit))
                .await
                .map_err(adapter_error("evm transfer error"))
        }
    }
}

async fn zk_lite_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let wallet = adapters.zk_lite()?;
    let transfer = ZkLiteTransfer {
        to: plan.maker().to_string(),
        token: plan.rule.from_chain.token_address.clone(),
        amount: wallet.closest_packable_amount(plan.amount),
    };

    let key_set = wallet
        .is_signing_key_set()
        .await
        .map_err(adapter_error("zkSync Lite signing key lookup failed"))?;
    if key_set {
        return wallet
            .transfer(transfer)
            .await
            .map_err(adapter_error("zkSync Lite transfer error"));
    }

    let account_id = wallet
        .account_id()
        .await
        .map_err(adapter_error("zkSync Lite account lookup failed"))?;
    let Some(account_id) = account_id else {
        return fail(
            ErrorKind::UnsupportedAccountState,
            "It is required to have a history of balances on the account to activate it.",
        );
    };

    debug!(account_id, "registering zkSync Lite signing key with transfer");
    let entries = wallet
        .submit_batch(ZkLiteBatch {
            account_id,
            transfer,
        })
        .await
        .map_err(adapter_error("zkSync Lite batch submission failed"))?;
    match entries.into_iter().find(|e| e.kind != ZkTxKind::ChangePubKey) {
        Some(entry) => Ok(entry.receipt),
        None => fail(ErrorKind::Adapter, "zkSync Lite batch returned no transfer"),
    }
}

async fn loopring_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let memo = routing_memo(&plan.destination.internal_id, plan.request.receiver())?;
    loopring_send(
        adapters,
        &plan.source,
        plan.maker(),
        &plan.rule.from_chain.token_address,
        plan.amount,
        memo,
    )
    .await
}

async fn loopring_send(
    adapters: &AdapterSet,
    chain: &ChainDescriptor,
    to: &str,
    token: &str,
    amount: U256,
    memo: String,
) -> Result<Receipt> {
    let account = adapters.loopring()?;
    let from = adapters.evm_signer()?.address().to_checksum(None);

    account
        .send_transfer(LoopringTransfer {
            from,
            chain_id: chain.chain_id.clone(),
            to: to.to_string(),
            token: token.to_string(),
            amount,
            memo,
        })
        .await
        .map_err(|cause| {
            let message =
                translate_adapter_message(LOOPRING_ERROR_MESSAGES, &format!("{cause:#}"));
            BridgeError::adapter(message.into_string(), cause)
        })
}

async fn starknet_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let account = adapters.starknet_signer()?;
    if !is_starknet_account(&account.address()) {
        return fail(ErrorKind::InvalidAddress, "Please check your starknet address.");
    }
    let receiver = require_text(
        plan.request.receiver(),
        "a receiver is required for transfers out of Starknet",
    )?;
    if plan.maker().len() < MIN_STARKNET_ENDPOINT_LEN {
        return fail(
            ErrorKind::InvalidAddress,
            format!("maker endpoint {} is not a Starknet address", plan.maker()),
        );
    }

    account
        .execute_transfer(StarknetTransfer {
            l1_receiver: receiver.to_string(),
            token: plan.rule.from_chain.token_address.clone(),
            maker: plan.maker().to_string(),
            amount: plan.amount,
            chain_id: plan.source.chain_id.clone(),
        })
        .await
        .map_err(adapter_error("starknet transfer error"))
}

async fn imx_transfer(plan: &ResolvedTransferPlan, adapters: &AdapterSet) -> Result<Receipt> {
    let client = adapters.imx()?;
    let sender = adapters.evm_signer()?.address().to_checksum(None);
    let token = if plan.is_native {
        ImxToken::Eth {
            decimals: plan.source_token.decimals,
        }
    } else {
        ImxToken::Erc20 {
            symbol: plan.source_token.symbol.clone(),
            decimals: plan.source_token.decimals,
            token_address: plan.rule.from_chain.token_address.clone(),
        }
    };

    client
        .transfer(ImxTransfer {
            sender,
            token,
            quantity: plan.amount,
            receiver: plan.maker().to_string(),
        })
        .await
        .map_err(adapter_error("Imx transfer error"))
}
