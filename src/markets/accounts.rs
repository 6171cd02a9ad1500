///////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////         DLMM ACCOUNT DATA            //////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////
//
// Borsh layouts of the lb_clmm program accounts this crate reads. Only the leading fields
// that are needed are declared; decoding reads a prefix and ignores the rest of the account.

use borsh::BorshDeserialize;
use solana_sdk::hash::hashv;
use solana_sdk::pubkey::Pubkey;

use crate::markets::errors::{DlmmError, DlmmResult};

pub const MAX_BIN_PER_ARRAY: usize = 70;
pub const MAX_BIN_PER_POSITION: usize = 70;

/// Anchor account discriminator: `sha256("account:<Name>")[..8]`.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let hash = hashv(&[b"account:".as_ref(), name.as_bytes()]);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.to_bytes()[..8]);
    out
}

/// Anchor instruction discriminator: `sha256("global:<name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let hash = hashv(&[b"global:".as_ref(), name.as_bytes()]);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.to_bytes()[..8]);
    out
}

/// Checks the discriminator and decodes the struct that follows it.
pub fn decode_account<T: BorshDeserialize>(
    kind: &'static str,
    address: &Pubkey,
    data: &[u8],
) -> DlmmResult<T> {
    let invalid = |details: String| DlmmError::InvalidAccountData {
        kind,
        address: address.to_string(),
        details,
    };

    if data.len() < 8 {
        return Err(invalid(format!("{} bytes is too short", data.len())));
    }
    if data[..8] != account_discriminator(kind) {
        return Err(invalid("discriminator mismatch".to_string()));
    }
    let mut body = &data[8..];
    T::deserialize(&mut body).map_err(|e| invalid(e.to_string()))
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticParameters {
    pub base_factor: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    pub max_volatility_accumulator: u32,
    pub min_bin_id: i32,
    pub max_bin_id: i32,
    pub protocol_share: u16,
    pub padding: [u8; 6],
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct VParameters {
    pub volatility_accumulator: u32,
    pub volatility_reference: u32,
    pub index_reference: i32,
    pub padding: [u8; 4],
    pub last_update_timestamp: i64,
    pub padding1: [u8; 8],
}

/// `LbPair`, up to the reserves.
#[derive(BorshDeserialize, Debug, Clone, PartialEq, Default)]
pub struct LbPairState {
    pub parameters: StaticParameters,
    pub v_parameters: VParameters,
    pub bump_seed: [u8; 1],
    pub bin_step_seed: [u8; 2],
    pub pair_type: u8,
    pub active_id: i32,
    pub bin_step: u16,
    pub status: u8,
    pub padding1: [u8; 5],
    pub token_x_mint: Pubkey,
    pub token_y_mint: Pubkey,
    pub reserve_x: Pubkey,
    pub reserve_y: Pubkey,
}

impl LbPairState {
    pub const NAME: &'static str = "LbPair";
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct UserRewardInfo {
    pub reward_per_token_completes: [u128; 2],
    pub reward_pendings: [u64; 2],
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct FeeInfo {
    pub fee_x_per_token_complete: u128,
    pub fee_y_per_token_complete: u128,
    pub fee_x_pending: u64,
    pub fee_y_pending: u64,
}

/// `PositionV2`, up to the bin range.
#[derive(BorshDeserialize, Debug, Clone, PartialEq)]
pub struct PositionV2State {
    pub lb_pair: Pubkey,
    pub owner: Pubkey,
    pub liquidity_shares: [u128; MAX_BIN_PER_POSITION],
    pub reward_infos: [UserRewardInfo; MAX_BIN_PER_POSITION],
    pub fee_infos: [FeeInfo; MAX_BIN_PER_POSITION],
    pub lower_bin_id: i32,
    pub upper_bin_id: i32,
}

impl PositionV2State {
    pub const NAME: &'static str = "PositionV2";
    /// Legacy layout with u64 shares; discovered but not decoded.
    pub const LEGACY_NAME: &'static str = "Position";
    /// discriminator + lb_pair
    pub const OWNER_OFFSET: usize = 8 + 32;
}

#[derive(BorshDeserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Bin {
    pub amount_x: u64,
    pub amount_y: u64,
    pub price: u128,
    pub liquidity_supply: u128,
    pub reward_per_token_stored: [u128; 2],
    pub fee_amount_x_per_token_stored: u128,
    pub fee_amount_y_per_token_stored: u128,
    pub amount_x_in: u128,
    pub amount_y_in: u128,
}

#[derive(BorshDeserialize, Debug, Clone, PartialEq)]
pub struct BinArrayState {
    pub index: i64,
    pub version: u8,
    pub padding: [u8; 7],
    pub lb_pair: Pubkey,
    pub bins: [Bin; MAX_BIN_PER_ARRAY],
}

impl BinArrayState {
    pub const NAME: &'static str = "BinArray";
}

/// Reads the lb_pair of a position (either layout) without decoding the rest.
pub fn position_lb_pair(data: &[u8]) -> Option<Pubkey> {
    let bytes: [u8; 32] = data.get(8..40)?.try_into().ok()?;
    Some(Pubkey::new_from_array(bytes))
}
