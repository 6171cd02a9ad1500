// src/markets/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DlmmError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Invalid public key '{value}'")]
    InvalidPubkey { value: String },

    #[error("Account {address} not found")]
    AccountNotFound { address: String },

    #[error("Invalid {kind} account data for {address}: {details}")]
    InvalidAccountData {
        kind: &'static str,
        address: String,
        details: String,
    },

    #[error("Missing or invalid argument '{0}'")]
    MissingArgument(&'static str),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Transaction {signature} not confirmed after {timeout_ms} ms")]
    ConfirmationTimeout { signature: String, timeout_ms: u64 },
}

// Helper to convert reqwest::Error with the requested url attached
impl From<(reqwest::Error, String)> for DlmmError {
    fn from(item: (reqwest::Error, String)) -> Self {
        DlmmError::Http {
            url: item.1,
            source: item.0,
        }
    }
}

pub type DlmmResult<T> = Result<T, DlmmError>;
