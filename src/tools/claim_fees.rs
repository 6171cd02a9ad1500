use async_trait::async_trait;
use log::info;
use serde_json::Value;
use solana_sdk::signature::{Keypair, Signature};

use crate::common::constants::SOLSCAN_TX_URL;
use crate::markets::errors::DlmmResult;
use crate::tools::args::{required_pubkey, string_props_schema};
use crate::tools::{CallToolResult, Tool, ToolContext};

pub const WALLET_NOT_CONFIGURED: &str = "❌ Error: Wallet not configured. Please provide 'walletPrivateKey' in the server configuration to perform transactions.";
pub const UNRESTRICTED_RPC_NOTE: &str = "Note: This operation requires an unrestricted RPC endpoint. Consider upgrading to a paid RPC provider.";

pub fn claim_success_text(signature: &Signature) -> String {
    format!(
        "✅ Fees claimed successfully!\n\nTransaction: {sig}\n\nView on Solscan: {url}{sig}",
        sig = signature,
        url = SOLSCAN_TX_URL
    )
}

pub struct ClaimFees;

impl ClaimFees {
    async fn run(&self, ctx: &ToolContext, args: &Value, owner: &Keypair) -> DlmmResult<Signature> {
        let lb_pair = required_pubkey(args, "poolAddress")?;
        let position = required_pubkey(args, "positionAddress")?;
        let signature = ctx.chain.claim_fees(&lb_pair, &position, owner).await?;
        ctx.metrics.inc_transactions_sent();
        info!("💰 Claimed fees for position {}: {}", position, signature);
        Ok(signature)
    }
}

#[async_trait]
impl Tool for ClaimFees {
    fn name(&self) -> &'static str {
        "claim_fees"
    }

    fn description(&self) -> &'static str {
        "Claim accumulated fees from a position (requires wallet configuration)"
    }

    fn input_schema(&self) -> Value {
        string_props_schema(&[
            ("poolAddress", "DLMM pool address"),
            ("positionAddress", "Position address"),
        ])
    }

    async fn call(&self, ctx: &ToolContext, args: &Value) -> CallToolResult {
        let Some(wallet) = ctx.wallet.as_deref() else {
            return CallToolResult::error(WALLET_NOT_CONFIGURED);
        };

        match self.run(ctx, args, wallet).await {
            Ok(signature) => CallToolResult::text(claim_success_text(&signature)),
            Err(e) => CallToolResult::error(format!(
                "❌ Error claiming fees: {}\n\n{}",
                e, UNRESTRICTED_RPC_NOTE
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{calls, context_with, MockApi, MockChain};
    use serde_json::json;
    use solana_sdk::pubkey::Pubkey;

    fn args() -> Value {
        json!({
            "poolAddress": Pubkey::new_unique().to_string(),
            "positionAddress": Pubkey::new_unique().to_string()
        })
    }

    #[tokio::test]
    async fn test_missing_wallet_short_circuits() {
        let (ctx, api, chain) = context_with(MockApi::failing(), MockChain::default(), None);
        let result = ClaimFees.call(&ctx, &args()).await;
        assert_eq!(result.first_text(), WALLET_NOT_CONFIGURED);
        assert_eq!(calls(&api.calls), 0);
        assert_eq!(calls(&chain.calls), 0);
    }

    #[tokio::test]
    async fn test_success_links_signature() {
        let signature = Signature::new_unique();
        let chain = MockChain {
            signature: Some(signature),
            ..MockChain::default()
        };
        let (ctx, _, _) = context_with(MockApi::failing(), chain, Some(Keypair::new()));

        let result = ClaimFees.call(&ctx, &args()).await;
        assert!(!result.is_error);
        let text = result.first_text();
        assert!(text.contains(&signature.to_string()));
        assert!(text.contains(&format!("https://solscan.io/tx/{}", signature)));
        assert_eq!(ctx.metrics.snapshot().transactions_sent, 1);
    }

    #[tokio::test]
    async fn test_failure_carries_rpc_note() {
        let (ctx, _, _) = context_with(MockApi::failing(), MockChain::default(), Some(Keypair::new()));
        let result = ClaimFees.call(&ctx, &args()).await;
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            format!(
                "❌ Error claiming fees: Transaction failed: blockhash not found\n\n{}",
                UNRESTRICTED_RPC_NOTE
            )
        );
        assert_eq!(ctx.metrics.snapshot().transactions_sent, 0);
    }

    #[tokio::test]
    async fn test_bad_address_never_reaches_chain() {
        let (ctx, _, chain) = context_with(MockApi::failing(), MockChain::default(), Some(Keypair::new()));
        let result = ClaimFees
            .call(&ctx, &json!({ "poolAddress": "bad", "positionAddress": "bad" }))
            .await;
        assert!(result.first_text().starts_with("❌ Error claiming fees: Invalid public key"));
        assert_eq!(calls(&chain.calls), 0);
    }
}
