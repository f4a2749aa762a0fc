// Transfer router and plan preview HTTP API
// This file ties catalog lookup, validation, strategy selection and the
// amount/instruction codecs into one pipeline, and exposes it over HTTP
//
// Numan Thabit 2025 Nov

use super::execution;
use super::routes::{
    RefundRequest, ResolvedTransferPlan, RouterInstruction, Strategy, TransferRequest,
};
use super::selector::select_strategy;
use super::validation::{
    check_bounds, is_valid_address, is_valid_starknet_receiver, require, require_text,
    starknet_hash_format,
};
use crate::adapters::{AdapterSet, Receipt, SignerIdentity};
use crate::catalog::chains::{CONTRACT_ROUTER_V3, CONTRACT_SOURCE};
use crate::catalog::{
    ChainDescriptor, ChainFamily, ChainRegistry, RuleCatalog, SettlementRule, Token,
};
use crate::codec::{
    encode, expected_destination_amount, routing_code, source_amount, to_base_units,
    InstructionKind, InstructionParams,
};
use crate::config::CoreConfig;
use crate::errors::{fail, BridgeError, ErrorKind, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Resolves requests into plans and dispatches them.
pub struct Router {
    chains: Arc<ChainRegistry>,
    rules: Arc<RuleCatalog>,
}

impl Router {
    pub fn new(chains: Arc<ChainRegistry>, rules: Arc<RuleCatalog>) -> Self {
        Self { chains, rules }
    }

    pub fn chains(&self) -> &Arc<ChainRegistry> {
        &self.chains
    }

    pub fn rules(&self) -> &Arc<RuleCatalog> {
        &self.rules
    }

    async fn chain(&self, config: &CoreConfig, id: &str) -> Result<ChainDescriptor> {
        let chain = self.chains.chain(config, id).await?;
        require(chain, ErrorKind::UnknownChain, &format!("chain {id} is not supported"))
    }

    /// Resolve `request` for `sender` without touching any adapter.
    #[tracing::instrument(skip_all, fields(
        from = %request.from_chain,
        to = %request.to_chain,
        from_currency = %request.from_currency,
        to_currency = %request.to_currency,
    ))]
    pub async fn plan(
        &self,
        config: &CoreConfig,
        request: &TransferRequest,
        sender: &str,
    ) -> Result<ResolvedTransferPlan> {
        let source = self.chain(config, &request.from_chain).await?;
        let destination = self.chain(config, &request.to_chain).await?;

        let rule = self
            .rules
            .find_rule(
                config,
                &source,
                &destination,
                &request.from_currency,
                &request.to_currency,
            )
            .await?;
        let rule = require(
            rule,
            ErrorKind::NoRouteFound,
            &format!(
                "no route for {}/{}-{}/{}",
                source.chain_id, destination.chain_id, request.from_currency, request.to_currency
            ),
        )?;

        check_bounds(request.amount, rule.min_amount(), rule.max_amount())?;

        let source_token = source.token_by_address(&rule.from_chain.token_address).cloned();
        let destination_token = destination
            .token_by_address(&rule.to_chain.token_address)
            .cloned();
        let (Some(source_token), Some(destination_token)) = (source_token, destination_token)
        else {
            return fail(ErrorKind::MissingField, "fromToken or toToken is empty.");
        };
        let is_native = source.is_native_token(&rule.from_chain.token_address);

        if let Some(receiver) = request.receiver() {
            if !is_valid_address(destination.family(), receiver) {
                return fail(
                    ErrorKind::InvalidAddress,
                    format!("receiver {receiver} is not a valid {} address", destination.name),
                );
            }
        }

        let strategy = select_strategy(&source, &destination, request);
        let code = if strategy.carries_routing_code() && destination.routing_code {
            Some(routing_code(&destination.internal_id)?)
        } else {
            None
        };
        let amount = source_amount(request.amount, source_token.decimals, rule.trade_fee, code)?;

        let instruction = match strategy {
            Strategy::VmRouter => Some(vm_router_instruction(
                request,
                &rule,
                &source,
                &destination_token,
                sender,
            )?),
            Strategy::ToStarknet => Some(to_starknet_instruction(request, &rule, &source, sender)?),
            _ => None,
        };

        info!(%strategy, %amount, is_native, maker = %rule.recipient, "transfer plan resolved");
        Ok(ResolvedTransferPlan {
            request: request.clone(),
            rule,
            source,
            destination,
            source_token,
            destination_token,
            strategy,
            amount,
            is_native,
            sender: sender.to_string(),
            instruction,
        })
    }

    /// Resolve and dispatch a transfer signed by `adapters`.
    #[tracing::instrument(skip_all, fields(
        from = %request.from_chain,
        to = %request.to_chain,
        amount = %request.amount,
    ))]
    pub async fn transfer(
        &self,
        config: &CoreConfig,
        request: &TransferRequest,
        adapters: &AdapterSet,
    ) -> Result<Receipt> {
        let plan = self.plan(config, request, &adapters.signer_address()).await?;
        check_signer(&plan.source, adapters).await?;
        execution::execute(&plan, adapters).await
    }

    /// Send a token amount straight to `request.to` on the source chain.
    #[tracing::instrument(skip_all, fields(
        chain = %request.from_chain,
        token = %request.token,
        amount = %request.amount,
    ))]
    pub async fn refund(
        &self,
        config: &CoreConfig,
        request: &RefundRequest,
        adapters: &AdapterSet,
    ) -> Result<Receipt> {
        let to = require_text(Some(request.to.as_str()), "a refund receiver is required")?;
        let query = require_text(Some(request.token.as_str()), "a refund token is required")?;
        check_bounds(request.amount, Decimal::ZERO, None)?;

        let chain = self.chain(config, &request.from_chain).await?;
        let token = require(
            chain.token(query).cloned(),
            ErrorKind::MissingField,
            &format!("token {query} is not listed on {}", chain.name),
        )?;
        let family = chain.family();
        if !is_valid_address(family, to) {
            return fail(
                ErrorKind::InvalidAddress,
                format!("refund receiver {to} is not a valid {} address", chain.name),
            );
        }
        let to = match family {
            ChainFamily::Starknet => starknet_hash_format(to),
            _ => to.to_string(),
        };
        let amount = to_base_units(request.amount, token.decimals)?;

        check_signer(&chain, adapters).await?;
        execution::refund(&chain, &token, &to, amount, adapters).await
    }
}

/// The signer must be able to sign on the source chain.
async fn check_signer(source: &ChainDescriptor, adapters: &AdapterSet) -> Result<()> {
    match (source.family(), adapters.signer()) {
        (ChainFamily::Starknet, SignerIdentity::Evm(_)) => fail(
            ErrorKind::SignerMismatch,
            format!("an EVM signer cannot send from {}", source.name),
        ),
        (ChainFamily::Starknet, SignerIdentity::Starknet(_)) => Ok(()),
        (_, SignerIdentity::Starknet(_)) => fail(
            ErrorKind::SignerMismatch,
            format!("a Starknet account cannot send from {}", source.name),
        ),
        (ChainFamily::Evm, SignerIdentity::Evm(adapter)) => {
            let Some(expected) = source.numeric_chain_id() else {
                return Ok(());
            };
            let actual = adapter
                .chain_id()
                .await
                .map_err(|e| BridgeError::adapter("signer chain id lookup failed", e))?;
            if actual != expected {
                return fail(
                    ErrorKind::SignerMismatch,
                    format!("signer is on chain {actual}, transfer source is {expected}"),
                );
            }
            Ok(())
        }
        (_, SignerIdentity::Evm(_)) => Ok(()),
    }
}

fn conversion_rate(rule: &SettlementRule) -> Result<Decimal> {
    match rule.rate {
        Some(rate) => Ok(rate),
        None if rule.from_chain.symbol == rule.to_chain.symbol => Ok(Decimal::ONE),
        None => fail(
            ErrorKind::MissingField,
            format!("rule {} has no conversion rate", rule.key()),
        ),
    }
}

fn vm_router_instruction(
    request: &TransferRequest,
    rule: &SettlementRule,
    source: &ChainDescriptor,
    destination_token: &Token,
    sender: &str,
) -> Result<RouterInstruction> {
    let contract = require(
        source.contract_address(CONTRACT_ROUTER_V3),
        ErrorKind::MissingField,
        &format!("Network {} does not support contract sending", source.chain_id),
    )?;
    let destination_address = request.receiver().unwrap_or(sender).to_string();

    let (kind, params) = if request.from_currency == request.to_currency {
        let params = InstructionParams {
            destination_chain_id: rule.to_chain.id.clone(),
            destination_address: Some(destination_address),
            sender: sender.to_string(),
            slippage: rule.slippage,
            ..Default::default()
        };
        (InstructionKind::Forward, params)
    } else {
        let expected = expected_destination_amount(
            request.amount,
            rule.withholding_fee,
            rule.trade_fee,
            conversion_rate(rule)?,
            destination_token.decimals,
        )?;
        let params = InstructionParams {
            destination_chain_id: rule.to_chain.id.clone(),
            destination_address: Some(destination_address),
            sender: sender.to_string(),
            destination_token: Some(rule.to_chain.token_address.clone()),
            expected_amount: Some(expected),
            slippage: rule.slippage,
        };
        (InstructionKind::ForwardAndConvert, params)
    };

    Ok(RouterInstruction {
        kind,
        contract: contract.to_string(),
        data: encode(kind, &params)?,
    })
}

fn to_starknet_instruction(
    request: &TransferRequest,
    rule: &SettlementRule,
    source: &ChainDescriptor,
    sender: &str,
) -> Result<RouterInstruction> {
    let receiver = match request.starknet_receiver() {
        Some(receiver) if is_valid_starknet_receiver(receiver) => starknet_hash_format(receiver),
        _ => return fail(ErrorKind::InvalidAddress, "please use correct starknet address"),
    };
    let contract = require(
        source.contract_address(CONTRACT_SOURCE),
        ErrorKind::MissingField,
        "Contract not in fromChainInfo.",
    )?;

    let params = InstructionParams {
        destination_chain_id: rule.to_chain.id.clone(),
        destination_address: Some(receiver),
        sender: sender.to_string(),
        slippage: rule.slippage,
        ..Default::default()
    };
    Ok(RouterInstruction {
        kind: InstructionKind::Forward,
        contract: contract.to_string(),
        data: encode(InstructionKind::Forward, &params)?,
    })
}

/// Shared state of the plan preview API.
#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<Router>,
    pub config: CoreConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(flatten)]
    pub transfer: TransferRequest,
    /// Address the transfer would be signed by.
    pub sender: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NoRouteFound | ErrorKind::UnknownChain => StatusCode::NOT_FOUND,
        ErrorKind::Catalog | ErrorKind::Adapter => StatusCode::BAD_GATEWAY,
        ErrorKind::OutOfBounds
        | ErrorKind::MissingField
        | ErrorKind::UnsupportedAccountState
        | ErrorKind::Encoding
        | ErrorKind::Computation
        | ErrorKind::InvalidAddress
        | ErrorKind::SignerMismatch => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn api_error(err: BridgeError) -> ApiError {
    (
        status_for(err.kind()),
        Json(ErrorResponse {
            kind: err.kind().to_string(),
            error: err.to_string(),
        }),
    )
}

/// Create the HTTP router with API endpoints
pub fn create_api_router(state: ApiState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/v1/chains", get(list_chains))
        .route("/api/v1/rules", get(list_rules))
        .route("/api/v1/plan", post(preview_plan))
        .route("/metrics", get(metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus text exposition of the default registry.
async fn metrics() -> Result<String, StatusCode> {
    let encoder = prometheus::TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn list_chains(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ChainDescriptor>>, ApiError> {
    let chains = state.router.chains.chains(&state.config).await.map_err(api_error)?;
    Ok(Json(chains.as_ref().clone()))
}

async fn list_rules(
    State(state): State<ApiState>,
) -> Result<Json<Vec<SettlementRule>>, ApiError> {
    let rules = state.router.rules.rules(&state.config).await.map_err(api_error)?;
    Ok(Json(rules.as_ref().clone()))
}

/// Resolve a plan without dispatching it.
async fn preview_plan(
    State(state): State<ApiState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<ResolvedTransferPlan>, ApiError> {
    let plan = state
        .router
        .plan(&state.config, &req.transfer, &req.sender)
        .await
        .map_err(api_error)?;
    Ok(Json(plan))
}
