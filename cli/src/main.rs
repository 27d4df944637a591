//! chainquery CLI: look up blocks and transactions from the terminal.
//!
//! Usage:
//! ```bash
//! # EVM block by height
//! chainquery block --backend evm --url https://cloudflare-eth.com --height 19000000
//!
//! # Cosmos transaction by hash (URL from COSMOS_RPC)
//! chainquery tx --backend cosmos --hash 0xABCD...
//! ```

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use chainquery_core::{Backend, ChainAdapter};
use chainquery_cosmos::CosmosAdapter;
use chainquery_evm::EvmAdapter;
use chainquery_http::{HttpTransport, HttpTransportConfig};

#[derive(Parser, Debug)]
#[command(
    name = "chainquery",
    about = "Look up EVM and Cosmos blocks and transactions",
    long_about = "
ChainQuery CLI: fetch a block by height or a transaction by hash from an
EVM JSON-RPC node or a Tendermint/Cosmos RPC node.

ENVIRONMENT VARIABLES:
  EVM_RPC       EVM node URL used when --url is omitted
  COSMOS_RPC    Cosmos node URL used when --url is omitted
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Node {
    /// Backend dialect: evm | cosmos
    #[arg(short, long)]
    backend: Backend,

    /// Node URL (overrides EVM_RPC / COSMOS_RPC)
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a block by height
    Block {
        #[command(flatten)]
        node: Node,
        /// Block height
        #[arg(long)]
        height: u64,
    },

    /// Fetch a transaction by hash
    Tx {
        #[command(flatten)]
        node: Node,
        /// Transaction hash
        #[arg(long)]
        hash: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let timeout = Duration::from_secs(cli.timeout_secs);
    match cli.command {
        Commands::Block { node, height } => {
            let transport = connect(&node, timeout)?;
            match node.backend {
                Backend::Evm => print_block(&EvmAdapter::new(transport), height).await,
                Backend::Cosmos => print_block(&CosmosAdapter::new(transport), height).await,
            }
        }
        Commands::Tx { node, hash } => {
            let transport = connect(&node, timeout)?;
            match node.backend {
                Backend::Evm => print_tx(&EvmAdapter::new(transport), &hash).await,
                Backend::Cosmos => print_tx(&CosmosAdapter::new(transport), &hash).await,
            }
        }
    }
}

/// The node URL: `--url`, else the backend's environment variable.
fn resolve_url(node: &Node, env: impl Fn(&str) -> Option<String>) -> Result<String> {
    if let Some(url) = &node.url {
        return Ok(url.clone());
    }
    let var = env_var(node.backend);
    env(var)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("--url is required when {var} is not set"))
}

fn env_var(backend: Backend) -> &'static str {
    match backend {
        Backend::Evm => "EVM_RPC",
        Backend::Cosmos => "COSMOS_RPC",
    }
}

fn connect(node: &Node, timeout: Duration) -> Result<Arc<HttpTransport>> {
    let url = resolve_url(node, |name| std::env::var(name).ok())?;
    let transport = HttpTransport::new(&url, HttpTransportConfig { request_timeout: timeout })?;
    Ok(Arc::new(transport))
}

async fn print_block<A: ChainAdapter>(adapter: &A, height: u64) -> Result<()> {
    let block = adapter.canonical_block(height).await?;
    tracing::debug!(
        backend = %block.backend(),
        height = block.height(),
        hash = block.hash(),
        "fetched block"
    );
    print_json(&block)
}

async fn print_tx<A: ChainAdapter>(adapter: &A, hash: &str) -> Result<()> {
    let tx = adapter.canonical_transaction(hash).await?;
    tracing::debug!(
        backend = %tx.backend(),
        hash = tx.hash(),
        height = ?tx.height(),
        "fetched transaction"
    );
    print_json(&tx)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
