// Maker bridge service entry point
// Loads configuration, builds the catalog sources and serves the plan
// preview API until shutdown
//
// Numan Thabit 2025 Nov

use anyhow::{anyhow, Context, Result};
use maker_bridge::catalog::{ChainRegistry, ChainSource, RuleCatalog, RuleSource, StaticCatalog};
use maker_bridge::config::{AppConfig, CatalogSourceConfig, CoreConfig};
use maker_bridge::router::{create_api_router, ApiState, Router};
use maker_bridge::transport::OpenApiClient;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal bridge error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;
    let core = config.core_config().context("validate network settings")?;

    let (chains, rules): (Arc<dyn ChainSource>, Arc<dyn RuleSource>) =
        match config.catalog_source()? {
            CatalogSourceConfig::File(path) => {
                let catalog = Arc::new(
                    StaticCatalog::load(&path)
                        .with_context(|| format!("load catalog file {}", path.display()))?,
                );
                info!(path = %path.display(), "using static catalog");
                let chains: Arc<dyn ChainSource> = catalog.clone();
                let rules: Arc<dyn RuleSource> = catalog;
                (chains, rules)
            }
            CatalogSourceConfig::OpenApi { mainnet, testnet } => {
                info!(%mainnet, testnet = ?testnet, "using OpenAPI catalog");
                let client = Arc::new(OpenApiClient::new(mainnet, testnet));
                let chains: Arc<dyn ChainSource> = client.clone();
                let rules: Arc<dyn RuleSource> = client;
                (chains, rules)
            }
        };

    let router = Arc::new(Router::new(
        Arc::new(ChainRegistry::new(chains)),
        Arc::new(RuleCatalog::new(rules)),
    ));
    warm_catalogs(&router, &core).await;

    let api_addr: std::net::SocketAddr = config
        .api_addr()
        .parse()
        .with_context(|| format!("parse API address {}", config.api_addr()))?;
    let api_router = create_api_router(ApiState {
        router,
        config: core.clone(),
    });

    info!(
        address = %api_addr,
        network = %core.network(),
        dealer = ?core.dealer_id(),
        "maker bridge plan API online"
    );
    let listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("bind API server address {api_addr}"))?;
    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;
    Ok(())
}

/// Load both catalogs once so configuration problems show up at startup.
async fn warm_catalogs(router: &Router, config: &CoreConfig) {
    match router.chains().chains(config).await {
        Ok(chains) => info!(chains = chains.len(), "chain catalog loaded"),
        Err(err) => warn!(error = %err, cause = ?err.cause(), "chain catalog unavailable; continuing"),
    }
    match router.rules().rules(config).await {
        Ok(rules) => info!(rules = rules.len(), "rule catalog loaded"),
        Err(err) => warn!(error = %err, cause = ?err.cause(), "rule catalog unavailable; continuing"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error");
    }
    info!("Shutdown signal received, exiting");
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
