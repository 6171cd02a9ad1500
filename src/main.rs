use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};

use meteora_dlmm_mcp::common::config::Config;
use meteora_dlmm_mcp::common::constants::{Env, SERVER_NAME, SERVER_VERSION};
use meteora_dlmm_mcp::common::utils::setup_logger;
use meteora_dlmm_mcp::markets::dlmm::DlmmClient;
use meteora_dlmm_mcp::markets::meteora::MeteoraApi;
use meteora_dlmm_mcp::mcp::McpServer;
use meteora_dlmm_mcp::telemetry::Metrics;
use meteora_dlmm_mcp::tools::{ToolContext, ToolRegistry};

/// Meteora DLMM tools served over MCP on stdio.
#[derive(Debug, Parser)]
#[command(name = "meteora-dlmm-mcp", version = SERVER_VERSION)]
struct Args {
    /// JSON file with rpcUrl, walletPrivateKey, debug, maxRetries, rpcTimeout, apiBaseUrl
    #[arg(short, long, env = "MCP_CONFIG")]
    config: Option<String>,

    /// Verbose logging regardless of DEBUG
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let env = Env::new();
    let mut config = Config::load(&env, args.config.as_deref())?;
    config.debug |= args.debug;

    setup_logger(config.debug)?;
    info!("{} v{}", SERVER_NAME, SERVER_VERSION);
    info!("RPC: {} | API: {}", config.rpc_url, config.api_base_url);

    let wallet = config.load_wallet();
    if wallet.is_none() {
        warn!("No wallet configured, claim_fees is disabled");
    }

    let ctx = ToolContext {
        api: Arc::new(MeteoraApi::from_config(&config)?),
        chain: Arc::new(DlmmClient::from_config(&config)?),
        wallet: wallet.map(Arc::new),
        metrics: Metrics::new(),
    };
    let server = McpServer::new(ToolRegistry::new(), ctx);

    let outcome = server.serve_stdio().await;
    server.context().metrics.log_summary();
    if let Err(e) = &outcome {
        error!("Server stopped: {:?}", e);
    }
    outcome
}
