//! DLMM REST API client (`https://dlmm-api.meteora.ag`).

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::common::config::Config;
use crate::markets::errors::{DlmmError, DlmmResult};
use crate::markets::types::PairInfo;

/// Read access to the DLMM REST API.
#[async_trait]
pub trait DlmmApi: Send + Sync {
    /// `GET /pair/all`
    async fn all_pairs(&self) -> DlmmResult<Vec<PairInfo>>;

    /// `GET /pair/{address}`
    async fn pair(&self, address: &str) -> DlmmResult<PairInfo>;

    /// `GET /user/{wallet}`. The schema is owned by the API, so the body is passed through.
    async fn user_positions(&self, wallet: &str) -> DlmmResult<Value>;
}

#[derive(Debug, Clone)]
pub struct MeteoraApi {
    client: Client,
    base_url: String,
}

impl MeteoraApi {
    pub fn new(base_url: &str, timeout: Duration) -> DlmmResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DlmmError::from((e, base_url.to_string())))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> DlmmResult<Self> {
        Self::new(&config.api_base_url, config.timeout())
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> DlmmResult<T> {
        let url = self.url(endpoint);
        debug!("API Call: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DlmmError::from((e, url.clone())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DlmmError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DlmmError::from((e, url.clone())))?;
        Ok(serde_json::from_str::<T>(&body)?)
    }
}

#[async_trait]
impl DlmmApi for MeteoraApi {
    async fn all_pairs(&self) -> DlmmResult<Vec<PairInfo>> {
        let entries: Vec<Value> = self.get_json("/pair/all").await?;
        Ok(decode_pairs(entries))
    }

    async fn pair(&self, address: &str) -> DlmmResult<PairInfo> {
        self.get_json(&format!("/pair/{}", address.trim())).await
    }

    async fn user_positions(&self, wallet: &str) -> DlmmResult<Value> {
        self.get_json(&format!("/user/{}", wallet.trim())).await
    }
}

/// Decodes each entry on its own; entries that do not decode are skipped.
pub fn decode_pairs(entries: Vec<Value>) -> Vec<PairInfo> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<PairInfo>(entry) {
            Ok(pair) => Some(pair),
            Err(e) => {
                debug!("Skipping /pair/all entry {}: {}", i, e);
                None
            }
        })
        .collect()
}

/// Pairs with positive liquidity, deepest first, at most `limit` of them.
pub fn top_pairs_by_liquidity(pairs: Vec<PairInfo>, limit: usize) -> Vec<PairInfo> {
    let mut ranked: Vec<(f64, PairInfo)> = pairs
        .into_iter()
        .map(|pair| (pair.liquidity_value(), pair))
        .filter(|(liquidity, _)| *liquidity > 0.0)
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, pair)| pair).collect()
}
