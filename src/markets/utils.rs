use solana_sdk::pubkey::Pubkey;

use crate::markets::accounts::{BinArrayState, PositionV2State, MAX_BIN_PER_ARRAY};
use crate::markets::errors::{DlmmError, DlmmResult};
use crate::markets::types::ClaimableFees;

pub const BASIS_POINT_MAX: f64 = 10_000.0;
/// Fixed point fraction bits used by the program (Q64.64)
pub const SCALE_OFFSET: u32 = 64;

pub const BIN_ARRAY_SEED: &[u8] = b"bin_array";
pub const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

/// Index of the bin array holding `bin_id`; rounds toward negative infinity.
pub fn bin_id_to_bin_array_index(bin_id: i32) -> i64 {
    (bin_id as i64).div_euclid(MAX_BIN_PER_ARRAY as i64)
}

/// Lower and upper bin ids covered by the array at `index`.
pub fn bin_array_bounds(index: i64) -> (i64, i64) {
    let lower = index * MAX_BIN_PER_ARRAY as i64;
    (lower, lower + MAX_BIN_PER_ARRAY as i64 - 1)
}

pub fn derive_bin_array_pda(lb_pair: &Pubkey, index: i64, program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[BIN_ARRAY_SEED, lb_pair.as_ref(), &index.to_le_bytes()],
        program_id,
    )
    .0
}

pub fn derive_event_authority_pda(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[EVENT_AUTHORITY_SEED], program_id).0
}

/// UI price of the bin: `(1 + bin_step / 10_000) ^ bin_id`, adjusted by mint decimals.
pub fn price_from_bin_id(bin_id: i32, bin_step: u16, decimals_x: u8, decimals_y: u8) -> f64 {
    let base = 1.0 + bin_step as f64 / BASIS_POINT_MAX;
    let raw = base.powi(bin_id);
    raw * 10f64.powi(decimals_x as i32 - decimals_y as i32)
}

/// `(a * b) >> 64` for a 64-bit `a`, without leaving u128.
fn mul_shr_64(a: u64, b: u128) -> u128 {
    let a = a as u128;
    let hi = b >> SCALE_OFFSET;
    let lo = b & (u64::MAX as u128);
    (a * hi).saturating_add((a * lo) >> SCALE_OFFSET)
}

/// Fee earned by `shares` since the position last settled against the bin.
pub fn accrued_fee(shares: u128, fee_per_token_stored: u128, fee_per_token_complete: u128) -> u64 {
    let liquidity = (shares >> SCALE_OFFSET) as u64;
    let delta = fee_per_token_stored.saturating_sub(fee_per_token_complete);
    let fee = mul_shr_64(liquidity, delta);
    u64::try_from(fee).unwrap_or(u64::MAX)
}

/// Sums pending plus newly accrued fees over every bin of the position.
///
/// `bin_arrays` must cover `lower_bin_id..=upper_bin_id`; arrays may be given in any order.
pub fn position_claimable_fees(
    position: &PositionV2State,
    bin_arrays: &[BinArrayState],
) -> DlmmResult<ClaimableFees> {
    let mut fees = ClaimableFees::default();

    for bin_id in position.lower_bin_id..=position.upper_bin_id {
        let slot = (bin_id - position.lower_bin_id) as usize;
        if slot >= position.liquidity_shares.len() {
            return Err(DlmmError::InvalidAccountData {
                kind: PositionV2State::NAME,
                address: position.lb_pair.to_string(),
                details: format!(
                    "bin range {}..={} wider than the position",
                    position.lower_bin_id, position.upper_bin_id
                ),
            });
        }

        let index = bin_id_to_bin_array_index(bin_id);
        let array = bin_arrays
            .iter()
            .find(|array| array.index == index)
            .ok_or_else(|| DlmmError::InvalidAccountData {
                kind: BinArrayState::NAME,
                address: position.lb_pair.to_string(),
                details: format!("bin array {} not loaded", index),
            })?;
        let (lower, _) = bin_array_bounds(index);
        let bin = &array.bins[(bin_id as i64 - lower) as usize];

        let shares = position.liquidity_shares[slot];
        let fee_info = &position.fee_infos[slot];

        let fee_x = accrued_fee(
            shares,
            bin.fee_amount_x_per_token_stored,
            fee_info.fee_x_per_token_complete,
        );
        let fee_y = accrued_fee(
            shares,
            bin.fee_amount_y_per_token_stored,
            fee_info.fee_y_per_token_complete,
        );

        fees.fee_x = fees
            .fee_x
            .saturating_add(fee_info.fee_x_pending)
            .saturating_add(fee_x);
        fees.fee_y = fees
            .fee_y
            .saturating_add(fee_info.fee_y_pending)
            .saturating_add(fee_y);
    }

    Ok(fees)
}
