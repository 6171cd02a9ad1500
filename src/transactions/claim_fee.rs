//! `claim_fee` instruction of the lb_clmm program.
//!
//! Account order follows the program's `ClaimFee` context (event-cpi variant):
//! lb_pair, position, bin_array_lower, bin_array_upper, sender, reserve_x, reserve_y,
//! user_token_x, user_token_y, token_x_mint, token_y_mint, token_program,
//! event_authority, program.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use crate::markets::accounts::{instruction_discriminator, LbPairState};
use crate::markets::utils::{
    bin_id_to_bin_array_index, derive_bin_array_pda, derive_event_authority_pda,
};

pub const CLAIM_FEE_IX: &str = "claim_fee";

#[derive(Debug, Clone)]
pub struct InstructionDetails {
    pub instruction: Instruction,
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct ClaimFeeParameters<'a> {
    pub program_id: Pubkey,
    pub lb_pair: Pubkey,
    pub pair: &'a LbPairState,
    pub position: Pubkey,
    pub lower_bin_id: i32,
    pub upper_bin_id: i32,
    pub owner: Pubkey,
    pub token_program: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimFeeAccounts {
    pub lb_pair: Pubkey,
    pub position: Pubkey,
    pub bin_array_lower: Pubkey,
    pub bin_array_upper: Pubkey,
    pub sender: Pubkey,
    pub reserve_x: Pubkey,
    pub reserve_y: Pubkey,
    pub user_token_x: Pubkey,
    pub user_token_y: Pubkey,
    pub token_x_mint: Pubkey,
    pub token_y_mint: Pubkey,
    pub token_program: Pubkey,
    pub event_authority: Pubkey,
    pub program: Pubkey,
}

impl ClaimFeeAccounts {
    pub fn resolve(params: &ClaimFeeParameters<'_>) -> Self {
        let lower_index = bin_id_to_bin_array_index(params.lower_bin_id);
        let upper_index = bin_id_to_bin_array_index(params.upper_bin_id);

        Self {
            lb_pair: params.lb_pair,
            position: params.position,
            bin_array_lower: derive_bin_array_pda(&params.lb_pair, lower_index, &params.program_id),
            bin_array_upper: derive_bin_array_pda(&params.lb_pair, upper_index, &params.program_id),
            sender: params.owner,
            reserve_x: params.pair.reserve_x,
            reserve_y: params.pair.reserve_y,
            user_token_x: get_associated_token_address_with_program_id(
                &params.owner,
                &params.pair.token_x_mint,
                &params.token_program,
            ),
            user_token_y: get_associated_token_address_with_program_id(
                &params.owner,
                &params.pair.token_y_mint,
                &params.token_program,
            ),
            token_x_mint: params.pair.token_x_mint,
            token_y_mint: params.pair.token_y_mint,
            token_program: params.token_program,
            event_authority: derive_event_authority_pda(&params.program_id),
            program: params.program_id,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.lb_pair, false),
            AccountMeta::new(self.position, false),
            AccountMeta::new(self.bin_array_lower, false),
            AccountMeta::new(self.bin_array_upper, false),
            AccountMeta::new_readonly(self.sender, true),
            AccountMeta::new(self.reserve_x, false),
            AccountMeta::new(self.reserve_y, false),
            AccountMeta::new(self.user_token_x, false),
            AccountMeta::new(self.user_token_y, false),
            AccountMeta::new_readonly(self.token_x_mint, false),
            AccountMeta::new_readonly(self.token_y_mint, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.event_authority, false),
            AccountMeta::new_readonly(self.program, false),
        ]
    }
}

pub fn claim_fee_instruction(accounts: &ClaimFeeAccounts) -> Instruction {
    Instruction {
        program_id: accounts.program,
        accounts: accounts.to_account_metas(),
        data: instruction_discriminator(CLAIM_FEE_IX).to_vec(),
    }
}

/// Idempotent ATA creation for both mints, then the claim itself.
pub fn construct_claim_fee_instructions(params: ClaimFeeParameters<'_>) -> Vec<InstructionDetails> {
    let accounts = ClaimFeeAccounts::resolve(&params);

    let mut instructions = Vec::with_capacity(3);
    for mint in [params.pair.token_x_mint, params.pair.token_y_mint] {
        instructions.push(InstructionDetails {
            instruction: create_associated_token_account_idempotent(
                &params.owner,
                &params.owner,
                &mint,
                &params.token_program,
            ),
            details: format!("Create ATA (idempotent) for {}", mint),
        });
    }
    instructions.push(InstructionDetails {
        instruction: claim_fee_instruction(&accounts),
        details: format!(
            "Claim fee: pool {} position {} bins {}..={}",
            params.lb_pair, params.position, params.lower_bin_id, params.upper_bin_id
        ),
    });
    instructions
}
