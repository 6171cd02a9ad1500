use async_trait::async_trait;
use serde_json::Value;

use crate::markets::errors::DlmmResult;
use crate::markets::types::PoolInfo;
use crate::tools::args::{required_str, string_props_schema};
use crate::tools::{CallToolResult, Tool, ToolContext};

pub struct GetPoolInfo;

impl GetPoolInfo {
    async fn run(&self, ctx: &ToolContext, args: &Value) -> DlmmResult<PoolInfo> {
        let pool_address = required_str(args, "poolAddress")?;
        let pair = ctx.api.pair(pool_address).await?;
        Ok(PoolInfo::from_pair(pool_address, &pair))
    }
}

#[async_trait]
impl Tool for GetPoolInfo {
    fn name(&self) -> &'static str {
        "get_pool_info"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a Meteora DLMM pool"
    }

    fn input_schema(&self) -> Value {
        string_props_schema(&[("poolAddress", "DLMM pool address")])
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        match self.run(ctx, args).await {
            Ok(info) => CallToolResult::json(&info),
            Err(e) => CallToolResult::error(format!("Error fetching pool info: {}", e)),
        }
    }
}
