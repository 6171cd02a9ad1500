use async_trait::async_trait;
use serde_json::{json, Value};

use crate::markets::errors::DlmmResult;
use crate::markets::meteora::top_pairs_by_liquidity;
use crate::markets::types::PoolSummary;
use crate::tools::args::optional_positive;
use crate::tools::{CallToolResult, Tool, ToolContext};

pub const DEFAULT_POOL_LIMIT: usize = 10;

pub struct GetPopularPools;

impl GetPopularPools {
    async fn run(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<Vec<PoolSummary>> {
        let limit = optional_positive(args, "limit").unwrap_or(DEFAULT_POOL_LIMIT);
        let pairs = ctx.api.all_pairs().await?;
        Ok(top_pairs_by_liquidity(pairs, limit)
            .iter()
            .map(PoolSummary::from)
            .collect())
    }
}

#[async_trait]
impl Tool for GetPopularPools {
    fn name(&self) -> &'static str {
        "get_popular_pools"
    }

    fn description(&self) -> &'static str {
        "Get list of popular Meteora DLMM pools"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "number",
                    "description": "Number of pools to return",
                    "default": DEFAULT_POOL_LIMIT
                }
            }
        })
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        match self.run(ctx, args).await {
            Ok(pools) => CallToolResult::json(&pools),
            Err(e) => CallToolResult::error(format!("Error fetching pools: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markets::types::PairInfo;
    use crate::tools::testing::{context, MockApi, MockChain};

    fn pairs(count: usize) -> Vec<PairInfo> {
        (0..count)
            .map(|i| PairInfo {
                address: format!("pool{}", i),
                name: format!("P{}", i),
                liquidity: format!("{}", i * 10),
                fees_24h: i as f64,
                ..PairInfo::default()
            })
            .collect()
    }

    async fn addresses(args: Value, available: usize) -> Vec<String> {
        let api = MockApi {
            pairs: Some(pairs(available)),
            ..MockApi::default()
        };
        let ctx = context(api, MockChain::default(), None);
        let result = GetPopularPools.call(&ctx, &args).await;
        assert!(!result.is_error);
        let rendered: Vec<Value> = serde_json::from_str(result.first_text()).unwrap();
        rendered
            .iter()
            .map(|pool| pool["address"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_default_limit_is_ten() {
        let got = addresses(json!({}), 30).await;
        assert_eq!(got.len(), DEFAULT_POOL_LIMIT);
        assert_eq!(got[0], "pool29");
    }

    #[tokio::test]
    async fn test_zero_limit_means_default() {
        assert_eq!(addresses(json!({ "limit": 0 }), 30).await.len(), 10);
    }

    #[tokio::test]
    async fn test_explicit_limit_and_zero_liquidity_excluded() {
        let got = addresses(json!({ "limit": 3 }), 30).await;
        assert_eq!(got, vec!["pool29", "pool28", "pool27"]);

        // pool0 has zero liquidity and never appears.
        let got = addresses(json!({ "limit": 50 }), 5).await;
        assert_eq!(got, vec!["pool4", "pool3", "pool2", "pool1"]);
    }

    #[tokio::test]
    async fn test_summary_shape() {
        let api = MockApi {
            pairs: Some(pairs(2)),
            ..MockApi::default()
        };
        let ctx = context(api, MockChain::default(), None);
        let result = GetPopularPools.call(&ctx, &json!({ "limit": 1 })).await;
        let rendered: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(
            rendered,
            json!([{
                "address": "pool1",
                "name": "P1",
                "tokenX": "",
                "tokenY": "",
                "liquidity": "10",
                "volume24h": 0.0,
                "fees24h": 1.0
            }])
        );
    }

    #[tokio::test]
    async fn test_api_failure_text() {
        let ctx = context(MockApi::failing(), MockChain::default(), None);
        let result = GetPopularPools.call(&ctx, &json!({})).await;
        assert!(result.is_error);
        assert!(result.first_text().starts_with("Error fetching pools: "));
    }
}
