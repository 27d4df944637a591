//! `chainquery-server`: serve block and transaction lookups over HTTP.

use anyhow::Context;
use chainquery_server::{build_app, init_tracing, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log);

    let app = build_app(&config).context("failed to build RPC transports")?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        evm_rpc = %config.evm_rpc,
        cosmos_rpc = %config.cosmos_rpc,
        "chainquery server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
