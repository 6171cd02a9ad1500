use async_trait::async_trait;
use log::warn;
use serde_json::Value;

use crate::markets::errors::DlmmResult;
use crate::markets::types::{ClaimableFees, ClaimableFeesReport};
use crate::tools::args::{required_pubkey, required_str, string_props_schema};
use crate::tools::{CallToolResult, Tool, ToolContext};

pub const FEE_NOTE: &str = "Fee calculation requires SDK with unrestricted RPC endpoint";
pub const FEE_SUGGESTION: &str = "Use a paid RPC provider (Helius, QuickNode) for fee calculations";

pub struct GetClaimableFees;

impl GetClaimableFees {
    async fn on_chain_fees(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<ClaimableFees> {
        let lb_pair = required_pubkey(args, "poolAddress")?;
        let position = required_pubkey(args, "positionAddress")?;
        ctx.chain.claimable_fees(&lb_pair, &position).await
    }

    /// Pool metadata must resolve; the fee amounts are best effort.
    async fn run(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<ClaimableFeesReport> {
        let pool_address = required_str(args, "poolAddress")?;
        let position_address = required_str(args, "positionAddress")?;
        let pair = ctx.api.pair(pool_address).await?;

        let mut report = ClaimableFeesReport {
            position_address: position_address.to_string(),
            pool_address: pool_address.to_string(),
            pool_name: pair.name,
            token_x: None,
            token_y: None,
            fee_x: None,
            fee_y: None,
            note: None,
            suggestion: None,
        };

        match self.on_chain_fees(ctx, args).await {
            Ok(fees) => {
                report.token_x = Some(pair.mint_x);
                report.token_y = Some(pair.mint_y);
                report.fee_x = Some(fees.fee_x);
                report.fee_y = Some(fees.fee_y);
            }
            Err(e) => {
                warn!("On-chain fee calculation for {} failed: {}", position_address, e);
                report.note = Some(FEE_NOTE.to_string());
                report.suggestion = Some(FEE_SUGGESTION.to_string());
            }
        }
        Ok(report)
    }
}

#[async_trait]
impl Tool for GetClaimableFees {
    fn name(&self) -> &'static str {
        "get_claimable_fees"
    }

    fn description(&self) -> &'static str {
        "Get claimable fees for a specific position"
    }

    fn input_schema(&self) -> Value {
        string_props_schema(&[
            ("poolAddress", "DLMM pool address"),
            ("positionAddress", "Position address"),
        ])
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        match self.run(ctx, args).await {
            Ok(report) => CallToolResult::json(&report),
            Err(e) => CallToolResult::error(format!("Error getting claimable fees: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markets::types::PairInfo;
    use crate::tools::testing::{calls, context_with, MockApi, MockChain};
    use serde_json::json;
    use solana_sdk::pubkey::Pubkey;

    fn args() -> (Value, String, String) {
        let pool = Pubkey::new_unique().to_string();
        let position = Pubkey::new_unique().to_string();
        (
            json!({ "poolAddress": pool, "positionAddress": position }),
            pool,
            position,
        )
    }

    fn api() -> MockApi {
        MockApi {
            pair: Some(PairInfo {
                name: "JUP-USDC".to_string(),
                mint_x: "MintX".to_string(),
                mint_y: "MintY".to_string(),
                ..PairInfo::default()
            }),
            ..MockApi::default()
        }
    }

    #[tokio::test]
    async fn test_reports_on_chain_amounts() {
        let chain = MockChain {
            fees: Some(ClaimableFees {
                fee_x: 1_500,
                fee_y: 42,
            }),
            ..MockChain::default()
        };
        let (ctx, _, _) = context_with(api(), chain, None);
        let (args, pool, position) = args();

        let result = GetClaimableFees.call(&ctx, &args).await;
        let rendered: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(
            rendered,
            json!({
                "positionAddress": position,
                "poolAddress": pool,
                "poolName": "JUP-USDC",
                "tokenX": "MintX",
                "tokenY": "MintY",
                "feeX": 1_500,
                "feeY": 42
            })
        );
    }

    #[tokio::test]
    async fn test_chain_failure_degrades_to_note() {
        let (ctx, _, chain) = context_with(api(), MockChain::default(), None);
        let (args, _, _) = args();

        let result = GetClaimableFees.call(&ctx, &args).await;
        assert!(!result.is_error);
        let rendered: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(rendered["poolName"], "JUP-USDC");
        assert_eq!(rendered["note"], FEE_NOTE);
        assert_eq!(rendered["suggestion"], FEE_SUGGESTION);
        assert!(rendered.get("feeX").is_none());
        assert_eq!(calls(&chain.calls), 1);
    }

    #[tokio::test]
    async fn test_api_failure_is_an_error() {
        let (ctx, _, chain) = context_with(MockApi::failing(), MockChain::default(), None);
        let (args, _, _) = args();

        let result = GetClaimableFees.call(&ctx, &args).await;
        assert!(result.is_error);
        assert!(result
            .first_text()
            .starts_with("Error getting claimable fees: "));
        assert_eq!(calls(&chain.calls), 0);
    }

    #[tokio::test]
    async fn test_unparseable_position_still_reports_pool() {
        let (ctx, _, chain) = context_with(api(), MockChain::default(), None);
        let args = json!({ "poolAddress": "pool", "positionAddress": "position" });

        let result = GetClaimableFees.call(&ctx, &args).await;
        let rendered: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(rendered["note"], FEE_NOTE);
        assert_eq!(calls(&chain.calls), 0);
    }
}
