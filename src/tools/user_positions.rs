use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use crate::common::utils::from_str;
use crate::markets::errors::DlmmResult;
use crate::markets::types::DataSource;
use crate::tools::args::{required_str, string_props_schema};
use crate::tools::{CallToolResult, Tool, ToolContext};

pub const NO_POSITIONS: &str = "No DLMM positions found for this wallet.";

pub struct GetUserPositions;

impl GetUserPositions {
    async fn run(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<CallToolResult> {
        let wallet = required_str(args, "userWallet")?;

        match ctx.api.user_positions(wallet).await {
            Ok(Value::Array(items)) if !items.is_empty() => {
                info!("{} positions for {} served from {}", items.len(), wallet, DataSource::Api);
                return Ok(CallToolResult::json(&items));
            }
            Ok(_) => debug!("API returned no positions for {}, using on-chain fallback", wallet),
            Err(e) => debug!("API user endpoint not available ({}), using on-chain fallback", e),
        }

        ctx.metrics.inc_position_fallbacks();
        let owner = from_str(wallet)?;
        let positions = ctx.chain.positions_by_owner(&owner).await?;
        info!(
            "{} positions for {} served from {}",
            positions.len(),
            wallet,
            DataSource::Chain
        );

        if positions.is_empty() {
            return Ok(CallToolResult::text(NO_POSITIONS));
        }
        Ok(CallToolResult::json(&positions))
    }
}

#[async_trait]
impl Tool for GetUserPositions {
    fn name(&self) -> &'static str {
        "get_user_positions"
    }

    fn description(&self) -> &'static str {
        "Get all user positions for a wallet address"
    }

    fn input_schema(&self) -> Value {
        string_props_schema(&[("userWallet", "User wallet address")])
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        self.run(ctx, args)
            .await
            .unwrap_or_else(|e| CallToolResult::error(format!("Error fetching positions: {}", e)))
    }
}
