use async_trait::async_trait;
use serde_json::Value;

use crate::markets::errors::DlmmResult;
use crate::markets::types::ActiveBin;
use crate::tools::args::{required_pubkey, string_props_schema};
use crate::tools::{CallToolResult, Tool, ToolContext};

/// Reads the pool account directly, so it also works for pools the API has not indexed.
pub struct GetActiveBin;

impl GetActiveBin {
    async fn run(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<ActiveBin> {
        let lb_pair = required_pubkey(args, "poolAddress")?;
        ctx.chain.active_bin(&lb_pair).await
    }
}

#[async_trait]
impl Tool for GetActiveBin {
    fn name(&self) -> &'static str {
        "get_active_bin"
    }

    fn description(&self) -> &'static str {
        "Get the active bin and its price for a Meteora DLMM pool, read from chain"
    }

    fn input_schema(&self) -> Value {
        string_props_schema(&[("poolAddress", "DLMM pool address")])
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        match self.run(ctx, args).await {
            Ok(bin) => CallToolResult::json(&bin),
            Err(e) => CallToolResult::error(format!("Error fetching active bin: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{calls, context_with, MockApi, MockChain};
    use serde_json::json;
    use solana_sdk::pubkey::Pubkey;

    #[tokio::test]
    async fn test_active_bin_rendered() {
        let chain = MockChain {
            active_bin: Some(ActiveBin {
                pool_address: "pool".to_string(),
                token_x: "X".to_string(),
                token_y: "Y".to_string(),
                active_bin_id: -120,
                bin_step: 25,
                active_price: 0.5,
            }),
            ..MockChain::default()
        };
        let (ctx, api, _) = context_with(MockApi::failing(), chain, None);

        let result = GetActiveBin
            .call(&ctx, &json!({ "poolAddress": Pubkey::new_unique().to_string() }))
            .await;
        let rendered: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(rendered["activeBinId"], -120);
        assert_eq!(rendered["binStep"], 25);
        assert_eq!(rendered["activePrice"], 0.5);
        assert_eq!(calls(&api.calls), 0);
    }

    #[tokio::test]
    async fn test_missing_pool_account() {
        let (ctx, _, _) = context_with(MockApi::failing(), MockChain::default(), None);
        let result = GetActiveBin
            .call(&ctx, &json!({ "poolAddress": Pubkey::new_unique().to_string() }))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            "Error fetching active bin: Account pool not found"
        );
    }
}
