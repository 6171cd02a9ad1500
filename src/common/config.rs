//! src/common/config.rs - Server configuration (environment + caller overrides)

use anyhow::{bail, Context, Result};
use base64::Engine;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::signature::{Keypair, Signer};
use std::fmt;
use std::fs;
use std::time::Duration;

use super::constants::{
    Env, DEFAULT_API_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RPC_TIMEOUT_MS, DEFAULT_RPC_URL,
};

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Solana RPC URL (e.g., https://solana-rpc.publicnode.com)
    pub rpc_url: String,
    /// Base64 encoded wallet secret key for transactions
    #[serde(default)]
    pub wallet_private_key: Option<String>,
    #[serde(default)]
    pub debug: bool,
    /// Forwarded to the RPC node as the send-transaction retry budget
    pub max_retries: usize,
    /// Milliseconds, applied to REST calls, RPC calls and confirmation wait
    pub rpc_timeout: u64,
    pub api_base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field(
                "wallet_private_key",
                &self.wallet_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("debug", &self.debug)
            .field("max_retries", &self.max_retries)
            .field("rpc_timeout", &self.rpc_timeout)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_private_key: None,
            debug: false,
            max_retries: DEFAULT_MAX_RETRIES,
            rpc_timeout: DEFAULT_RPC_TIMEOUT_MS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    pub fn from_env(env: &Env) -> Self {
        let defaults = Self::default();
        Self {
            rpc_url: non_empty(&env.rpc_url).unwrap_or(defaults.rpc_url),
            wallet_private_key: non_empty(&env.wallet_private_key),
            debug: env.debug == "true",
            max_retries: env.max_retries.unwrap_or(defaults.max_retries),
            rpc_timeout: env.rpc_timeout.unwrap_or(defaults.rpc_timeout),
            api_base_url: non_empty(&env.api_base_url).unwrap_or(defaults.api_base_url),
        }
    }

    /// Applies the fields named in a caller-supplied JSON object on top of `self`.
    pub fn with_overrides(self, overrides: &Value) -> Result<Self> {
        let Value::Object(fields) = overrides else {
            bail!("configuration overrides must be a JSON object");
        };

        let mut merged = serde_json::to_value(&self)?;
        if let Value::Object(base) = &mut merged {
            for (key, value) in fields {
                base.insert(key.clone(), value.clone());
            }
        }
        let mut config: Config =
            serde_json::from_value(merged).context("invalid configuration override")?;
        config.wallet_private_key = config.wallet_private_key.as_deref().and_then(non_empty);
        config.validate()?;
        Ok(config)
    }

    /// Environment first, then the optional JSON file on top.
    pub fn load(env: &Env, path: Option<&str>) -> Result<Self> {
        let config = Self::from_env(env);
        let config = match path {
            Some(path) => {
                let config_str = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                let overrides: Value = serde_json::from_str(&config_str)
                    .with_context(|| format!("failed to parse config file {}", path))?;
                config.with_overrides(&overrides)?
            }
            None => config,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.rpc_url).with_context(|| format!("invalid rpcUrl {}", self.rpc_url))?;
        url::Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid apiBaseUrl {}", self.api_base_url))?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout)
    }

    /// Decodes the configured wallet. A malformed key is logged and treated as absent.
    pub fn load_wallet(&self) -> Option<Keypair> {
        let encoded = self.wallet_private_key.as_deref()?;
        match decode_keypair(encoded) {
            Ok(wallet) => {
                info!("Wallet loaded: {}", wallet.pubkey());
                Some(wallet)
            }
            Err(e) => {
                error!(
                    "Invalid private key format. Expected base64 encoded private key. ({})",
                    e
                );
                None
            }
        }
    }
}

/// Accepts the 64-byte secret key as base64, or as base58 (the Phantom export format).
pub fn decode_keypair(encoded: &str) -> Result<Keypair> {
    let encoded = encoded.trim();
    let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) if bytes.len() == 64 => bytes,
        _ => bs58::decode(encoded)
            .into_vec()
            .context("key is neither base64 nor base58")?,
    };
    Keypair::from_bytes(&bytes).map_err(|e| anyhow::anyhow!("invalid secret key bytes: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_env() -> Env {
        Env {
            rpc_url: String::new(),
            wallet_private_key: String::new(),
            debug: String::new(),
            max_retries: None,
            rpc_timeout: None,
            api_base_url: String::new(),
        }
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_env(&empty_env());
        assert_eq!(config, Config::default());
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert!(config.wallet_private_key.is_none());
    }

    #[test]
    fn test_environment_values_are_used() {
        let env = Env {
            rpc_url: "https://rpc.example.com".to_string(),
            wallet_private_key: "abc".to_string(),
            debug: "true".to_string(),
            max_retries: Some(7),
            rpc_timeout: Some(1500),
            api_base_url: "http://localhost:8080".to_string(),
        };
        let config = Config::from_env(&env);
        assert_eq!(config.rpc_url, "https://rpc.example.com");
        assert_eq!(config.wallet_private_key.as_deref(), Some("abc"));
        assert!(config.debug);
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.rpc_timeout, 1500);
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_debug_flag_requires_literal_true() {
        let mut env = empty_env();
        env.debug = "1".to_string();
        assert!(!Config::from_env(&env).debug);
    }

    #[test]
    fn test_overrides_replace_only_named_fields() {
        let config = Config::default()
            .with_overrides(&json!({ "rpcUrl": "https://other.rpc", "debug": true }))
            .unwrap();
        assert_eq!(config.rpc_url, "https://other.rpc");
        assert!(config.debug);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_blank_wallet_override_means_no_wallet() {
        let config = Config {
            wallet_private_key: Some("abc".to_string()),
            ..Config::default()
        };
        let config = config
            .with_overrides(&json!({ "walletPrivateKey": "  " }))
            .unwrap();
        assert!(config.wallet_private_key.is_none());
        assert!(config.load_wallet().is_none());

        let config = Config::default()
            .with_overrides(&json!({ "walletPrivateKey": " key " }))
            .unwrap();
        assert_eq!(config.wallet_private_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_overrides_reject_bad_input() {
        assert!(Config::default().with_overrides(&json!([1, 2])).is_err());
        assert!(Config::default()
            .with_overrides(&json!({ "rpcUrl": "not a url" }))
            .is_err());
        assert!(Config::default()
            .with_overrides(&json!({ "maxRetries": "three" }))
            .is_err());
    }

    #[test]
    fn test_wallet_decoding_base64_and_base58() {
        let keypair = Keypair::new();
        let b64 = base64::engine::general_purpose::STANDARD.encode(keypair.to_bytes());
        let decoded = decode_keypair(&b64).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());

        let b58 = keypair.to_base58_string();
        let decoded = decode_keypair(&b58).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_invalid_wallet_runs_read_only() {
        let config = Config {
            wallet_private_key: Some("definitely-not-a-key".to_string()),
            ..Config::default()
        };
        assert!(config.load_wallet().is_none());
        assert!(Config::default().load_wallet().is_none());
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = Config {
            wallet_private_key: Some("secret".to_string()),
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
