use log::{error, info};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use solana_transaction_status::{TransactionConfirmationStatus, UiTransactionEncoding};
use std::time::{Duration, Instant};

use crate::markets::errors::{DlmmError, DlmmResult};
use crate::transactions::claim_fee::InstructionDetails;

#[derive(Debug, Clone)]
pub struct SendSettings {
    /// Passed through to the RPC node, which rebroadcasts until the blockhash expires
    pub max_retries: usize,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl SendSettings {
    pub fn send_config(&self) -> RpcSendTransactionConfig {
        RpcSendTransactionConfig {
            skip_preflight: false,
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            encoding: Some(UiTransactionEncoding::Base64),
            max_retries: Some(self.max_retries),
            min_context_slot: None,
        }
    }
}

pub async fn send_and_confirm(
    rpc_client: &RpcClient,
    instructions: &[InstructionDetails],
    payer: &Keypair,
    settings: &SendSettings,
) -> DlmmResult<Signature> {
    let instructions: Vec<Instruction> = instructions
        .iter()
        .map(|details| details.instruction.clone())
        .collect();

    let latest_blockhash = rpc_client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &instructions,
        Some(&payer.pubkey()),
        &[payer],
        latest_blockhash,
    );

    info!("📡 Sending transaction with RPC: {}", rpc_client.url());
    let signature = rpc_client
        .send_transaction_with_config(&transaction, settings.send_config())
        .await?;
    info!("✅ Transaction sent with signature: {}", signature);

    wait_for_confirmation(rpc_client, &signature, settings).await?;
    info!("✅ Transaction confirmed!");
    Ok(signature)
}

/// Polls the signature status until it reaches `confirmed`, fails, or the timeout elapses.
pub async fn wait_for_confirmation(
    rpc_client: &RpcClient,
    signature: &Signature,
    settings: &SendSettings,
) -> DlmmResult<()> {
    let started = Instant::now();
    loop {
        let statuses = rpc_client.get_signature_statuses(&[*signature]).await?;
        if let Some(Some(status)) = statuses.value.first() {
            if let Some(err) = &status.err {
                error!("❌ Transaction {} failed: {:?}", signature, err);
                return Err(DlmmError::Transaction(err.to_string()));
            }
            if matches!(
                status.confirmation_status,
                Some(TransactionConfirmationStatus::Confirmed)
                    | Some(TransactionConfirmationStatus::Finalized)
            ) {
                return Ok(());
            }
        }

        if started.elapsed() >= settings.confirmation_timeout {
            return Err(DlmmError::ConfirmationTimeout {
                signature: signature.to_string(),
                timeout_ms: settings.confirmation_timeout.as_millis() as u64,
            });
        }
        tokio::time::sleep(settings.poll_interval).await;
    }
}
