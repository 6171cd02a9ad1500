pub static PROJECT_NAME: &str = "meteora_dlmm_mcp";

pub const SERVER_NAME: &str = "Meteora DLMM MCP Server (Hybrid)";
pub const SERVER_VERSION: &str = "2.0.0";

pub const DEFAULT_RPC_URL: &str = "https://solana-rpc.publicnode.com";
pub const DEFAULT_API_BASE_URL: &str = "https://dlmm-api.meteora.ag";
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 30_000;

/// Meteora DLMM program (mainnet)
pub const LB_CLMM_PROGRAM_ID: &str = "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo";

pub const SOLSCAN_TX_URL: &str = "https://solscan.io/tx/";

pub fn get_env(key: &str) -> String {
    std::env::var(key).unwrap_or(String::from(""))
}

/// Raw process environment, read once at startup.
#[derive(Debug, Clone)]
pub struct Env {
    pub rpc_url: String,
    pub wallet_private_key: String,
    pub debug: String,
    pub max_retries: Option<usize>,
    pub rpc_timeout: Option<u64>,
    pub api_base_url: String,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Env {
            rpc_url: get_env("RPC_URL"),
            wallet_private_key: get_env("WALLET_PRIVATE_KEY"),
            debug: get_env("DEBUG"),
            max_retries: get_env("MAX_RETRIES").parse().ok(),
            rpc_timeout: get_env("RPC_TIMEOUT").parse().ok(),
            api_base_url: get_env("DLMM_API_URL"),
        }
    }
}
