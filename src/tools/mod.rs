//! MCP tools exposed by the server.
//!
//! Every tool resolves to a [`CallToolResult`] holding one text item, whether the call
//! succeeded or not. Adapter errors are rendered into that text at the tool boundary.

pub mod active_bin;
pub mod args;
pub mod claim_fees;
pub mod claimable_fees;
pub mod pool_info;
pub mod popular_pools;
pub mod user_positions;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use solana_sdk::signature::Keypair;
use std::sync::Arc;

use crate::markets::dlmm::DlmmChain;
use crate::markets::meteora::DlmmApi;
use crate::telemetry::Metrics;

pub use active_bin::GetActiveBin;
pub use claim_fees::ClaimFees;
pub use claimable_fees::GetClaimableFees;
pub use pool_info::GetPoolInfo;
pub use popular_pools::GetPopularPools;
pub use user_positions::GetUserPositions;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// Pretty-printed JSON payload.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }

    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Shared handles every tool call runs against.
#[derive(Clone)]
pub struct ToolContext {
    pub api: Arc<dyn DlmmApi>,
    pub chain: Arc<dyn DlmmChain>,
    pub wallet: Option<Arc<Keypair>>,
    pub metrics: Arc<Metrics>,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;
    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: vec![
                Box::new(GetPoolInfo),
                Box::new(GetUserPositions),
                Box::new(GetPopularPools),
                Box::new(GetClaimableFees),
                Box::new(ClaimFees),
                Box::new(GetActiveBin),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// `None` when no tool has that name.
    pub async fn call(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: &Value,
    ) -> Option<CallToolResult> {
        let tool = self.get(name)?;
        ctx.metrics.inc_tool_calls();
        debug!("🛠️ {} {}", name, args);

        let result = tool.call(ctx, args).await;
        if result.is_error {
            ctx.metrics.inc_tool_failures();
            warn!("{} failed: {}", name, result.first_text());
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{context, MockApi, MockChain};
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(CallToolResult::text("hi")).unwrap();
        assert_eq!(ok, json!({ "content": [{ "type": "text", "text": "hi" }] }));

        let err = serde_json::to_value(CallToolResult::error("boom")).unwrap();
        assert_eq!(
            err,
            json!({ "content": [{ "type": "text", "text": "boom" }], "isError": true })
        );

        let pretty = CallToolResult::json(&json!({ "a": 1 }));
        assert_eq!(pretty.first_text(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_registry_lists_every_tool_once() {
        let registry = ToolRegistry::new();
        let names: Vec<&str> = registry.descriptors().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "get_pool_info",
                "get_user_positions",
                "get_popular_pools",
                "get_claimable_fees",
                "claim_fees",
                "get_active_bin"
            ]
        );
        for descriptor in registry.descriptors() {
            assert_eq!(descriptor.input_schema["type"], "object");
            assert!(!descriptor.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_registry_counts_calls_and_failures() {
        let api = MockApi::failing();
        let ctx = context(api, MockChain::default(), None);
        let registry = ToolRegistry::new();

        assert!(registry.call("nope", &ctx, &json!({})).await.is_none());

        let result = registry
            .call("get_pool_info", &ctx, &json!({ "poolAddress": "x" }))
            .await
            .unwrap();
        assert!(result.is_error);
        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.tool_calls, 1);
        assert_eq!(snapshot.tool_failures, 1);
    }
}
