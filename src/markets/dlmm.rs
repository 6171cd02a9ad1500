//! On-chain access to the lb_clmm (DLMM) program through a Solana RPC node.

use anchor_spl::token::spl_token;
use async_trait::async_trait;
use log::{debug, info};
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType};
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use std::sync::Arc;
use std::time::Duration;

use crate::common::config::Config;
use crate::common::constants::LB_CLMM_PROGRAM_ID;
use crate::common::utils::from_str;
use crate::markets::accounts::{
    account_discriminator, decode_account, position_lb_pair, BinArrayState, LbPairState,
    PositionV2State,
};
use crate::markets::errors::{DlmmError, DlmmResult};
use crate::markets::types::{ActiveBin, ClaimableFees, PositionSummary};
use crate::markets::utils::{
    bin_id_to_bin_array_index, derive_bin_array_pda, position_claimable_fees, price_from_bin_id,
};
use crate::transactions::claim_fee::{construct_claim_fee_instructions, ClaimFeeParameters};
use crate::transactions::utils::{send_and_confirm, SendSettings};

/// The operations the vendor SDK provides, expressed against chain state.
#[async_trait]
pub trait DlmmChain: Send + Sync {
    /// Every DLMM position (both layouts) owned by `owner`.
    async fn positions_by_owner(&self, owner: &Pubkey) -> DlmmResult<Vec<PositionSummary>>;

    async fn active_bin(&self, lb_pair: &Pubkey) -> DlmmResult<ActiveBin>;

    async fn claimable_fees(&self, lb_pair: &Pubkey, position: &Pubkey)
        -> DlmmResult<ClaimableFees>;

    /// Builds, signs, submits and confirms a `claim_fee` transaction.
    async fn claim_fees(
        &self,
        lb_pair: &Pubkey,
        position: &Pubkey,
        owner: &Keypair,
    ) -> DlmmResult<Signature>;
}

pub struct DlmmClient {
    rpc_client: Arc<RpcClient>,
    program_id: Pubkey,
    send_settings: SendSettings,
}

impl DlmmClient {
    pub fn new(rpc_client: Arc<RpcClient>, send_settings: SendSettings) -> DlmmResult<Self> {
        Ok(Self {
            rpc_client,
            program_id: from_str(LB_CLMM_PROGRAM_ID)?,
            send_settings,
        })
    }

    pub fn from_config(config: &Config) -> DlmmResult<Self> {
        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.timeout(),
            CommitmentConfig::confirmed(),
        ));
        Self::new(
            rpc_client,
            SendSettings {
                max_retries: config.max_retries,
                confirmation_timeout: config.timeout(),
                poll_interval: Duration::from_millis(500),
            },
        )
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    async fn fetch_account(&self, address: &Pubkey) -> DlmmResult<Account> {
        self.rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?
            .value
            .ok_or_else(|| DlmmError::AccountNotFound {
                address: address.to_string(),
            })
    }

    pub async fn fetch_lb_pair(&self, lb_pair: &Pubkey) -> DlmmResult<LbPairState> {
        let account = self.fetch_account(lb_pair).await?;
        decode_account(LbPairState::NAME, lb_pair, &account.data)
    }

    pub async fn fetch_position(&self, position: &Pubkey) -> DlmmResult<PositionV2State> {
        let account = self.fetch_account(position).await?;
        decode_position(position, &account.data)
    }

    /// One round trip; a missing account is an error.
    async fn fetch_accounts(&self, addresses: &[Pubkey]) -> DlmmResult<Vec<Account>> {
        let accounts = self.rpc_client.get_multiple_accounts(addresses).await?;
        addresses
            .iter()
            .zip(accounts)
            .map(|(address, account)| {
                account.ok_or_else(|| DlmmError::AccountNotFound {
                    address: address.to_string(),
                })
            })
            .collect()
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> DlmmResult<u8> {
        let account = self.fetch_account(mint).await?;
        // Token-2022 mints share the base layout and append extensions after it
        let base = account
            .data
            .get(..spl_token::state::Mint::LEN)
            .ok_or_else(|| DlmmError::InvalidAccountData {
                kind: "Mint",
                address: mint.to_string(),
                details: format!("{} bytes", account.data.len()),
            })?;
        let state = spl_token::state::Mint::unpack(base).map_err(|e| {
            DlmmError::InvalidAccountData {
                kind: "Mint",
                address: mint.to_string(),
                details: e.to_string(),
            }
        })?;
        Ok(state.decimals)
    }

    /// Both mints must live under the same token program for `claim_fee`.
    async fn token_program_for(&self, pair: &LbPairState) -> DlmmResult<Pubkey> {
        let mints = self
            .fetch_accounts(&[pair.token_x_mint, pair.token_y_mint])
            .await?;
        let (mint_x, mint_y) = (&mints[0], &mints[1]);
        if mint_x.owner != mint_y.owner {
            return Err(DlmmError::Transaction(format!(
                "mints are owned by different token programs ({} / {})",
                mint_x.owner, mint_y.owner
            )));
        }
        Ok(mint_x.owner)
    }

    async fn fetch_bin_arrays(
        &self,
        lb_pair: &Pubkey,
        lower_bin_id: i32,
        upper_bin_id: i32,
    ) -> DlmmResult<Vec<BinArrayState>> {
        let lower = bin_id_to_bin_array_index(lower_bin_id);
        let upper = bin_id_to_bin_array_index(upper_bin_id);
        let addresses: Vec<Pubkey> = (lower..=upper)
            .map(|index| derive_bin_array_pda(lb_pair, index, &self.program_id))
            .collect();

        let accounts = self.fetch_accounts(&addresses).await?;
        addresses
            .iter()
            .zip(accounts)
            .map(|(address, account)| decode_account(BinArrayState::NAME, address, &account.data))
            .collect()
    }

    async fn positions_with_discriminator(
        &self,
        owner: &Pubkey,
        account_name: &str,
    ) -> DlmmResult<Vec<PositionSummary>> {
        let config =
            position_accounts_config(owner, account_name, self.rpc_client.commitment());
        let accounts = self
            .rpc_client
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;

        Ok(accounts
            .into_iter()
            .filter_map(|(address, account)| {
                position_lb_pair(&account.data).map(|lb_pair| PositionSummary {
                    position_address: address.to_string(),
                    pool_address: lb_pair.to_string(),
                })
            })
            .collect())
    }
}

/// Rejects the legacy `Position` layout, then decodes `PositionV2`.
fn decode_position(address: &Pubkey, data: &[u8]) -> DlmmResult<PositionV2State> {
    if data.get(..8) == Some(&account_discriminator(PositionV2State::LEGACY_NAME)[..]) {
        return Err(DlmmError::InvalidAccountData {
            kind: PositionV2State::NAME,
            address: address.to_string(),
            details: "legacy position layout is not supported".to_string(),
        });
    }
    decode_account(PositionV2State::NAME, address, data)
}

/// gPA config for positions of one layout owned by `owner`.
pub fn position_accounts_config(
    owner: &Pubkey,
    account_name: &str,
    commitment: CommitmentConfig,
) -> RpcProgramAccountsConfig {
    let filters = vec![
        RpcFilterType::Memcmp(Memcmp::new(
            0,
            MemcmpEncodedBytes::Base58(
                bs58::encode(account_discriminator(account_name)).into_string(),
            ),
        )),
        RpcFilterType::Memcmp(Memcmp::new(
            PositionV2State::OWNER_OFFSET,
            MemcmpEncodedBytes::Base58(owner.to_string()),
        )),
    ];

    RpcProgramAccountsConfig {
        filters: Some(filters),
        account_config: RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            // discriminator + lb_pair is all we need
            data_slice: Some(UiDataSliceConfig {
                offset: 0,
                length: PositionV2State::OWNER_OFFSET,
            }),
            commitment: Some(commitment),
            ..RpcAccountInfoConfig::default()
        },
        ..RpcProgramAccountsConfig::default()
    }
}

#[async_trait]
impl DlmmChain for DlmmClient {
    async fn positions_by_owner(&self, owner: &Pubkey) -> DlmmResult<Vec<PositionSummary>> {
        let mut positions = self
            .positions_with_discriminator(owner, PositionV2State::NAME)
            .await?;
        positions.extend(
            self.positions_with_discriminator(owner, PositionV2State::LEGACY_NAME)
                .await?,
        );
        debug!("{} on-chain positions for {}", positions.len(), owner);
        Ok(positions)
    }

    async fn active_bin(&self, lb_pair: &Pubkey) -> DlmmResult<ActiveBin> {
        let pair = self.fetch_lb_pair(lb_pair).await?;
        let decimals_x = self.mint_decimals(&pair.token_x_mint).await?;
        let decimals_y = self.mint_decimals(&pair.token_y_mint).await?;

        Ok(ActiveBin {
            pool_address: lb_pair.to_string(),
            token_x: pair.token_x_mint.to_string(),
            token_y: pair.token_y_mint.to_string(),
            active_bin_id: pair.active_id,
            bin_step: pair.bin_step,
            active_price: price_from_bin_id(pair.active_id, pair.bin_step, decimals_x, decimals_y),
        })
    }

    async fn claimable_fees(
        &self,
        lb_pair: &Pubkey,
        position: &Pubkey,
    ) -> DlmmResult<ClaimableFees> {
        let state = self.fetch_position(position).await?;
        if state.lb_pair != *lb_pair {
            return Err(DlmmError::InvalidAccountData {
                kind: PositionV2State::NAME,
                address: position.to_string(),
                details: format!("position belongs to pool {}", state.lb_pair),
            });
        }
        let bin_arrays = self
            .fetch_bin_arrays(lb_pair, state.lower_bin_id, state.upper_bin_id)
            .await?;
        position_claimable_fees(&state, &bin_arrays)
    }

    async fn claim_fees(
        &self,
        lb_pair: &Pubkey,
        position: &Pubkey,
        owner: &Keypair,
    ) -> DlmmResult<Signature> {
        let accounts = self.fetch_accounts(&[*lb_pair, *position]).await?;
        let pair: LbPairState = decode_account(LbPairState::NAME, lb_pair, &accounts[0].data)?;
        let state = decode_position(position, &accounts[1].data)?;
        if state.lb_pair != *lb_pair {
            return Err(DlmmError::Transaction(format!(
                "position {} belongs to pool {}",
                position, state.lb_pair
            )));
        }
        if state.owner != owner.pubkey() {
            return Err(DlmmError::Transaction(format!(
                "position {} is owned by {}, not the configured wallet",
                position, state.owner
            )));
        }
        let token_program = self.token_program_for(&pair).await?;

        let instructions = construct_claim_fee_instructions(ClaimFeeParameters {
            program_id: self.program_id,
            lb_pair: *lb_pair,
            pair: &pair,
            position: *position,
            lower_bin_id: state.lower_bin_id,
            upper_bin_id: state.upper_bin_id,
            owner: owner.pubkey(),
            token_program,
        });
        info!(
            "📋 Claim instructions: {:?}",
            instructions.iter().map(|i| i.details.as_str()).collect::<Vec<_>>()
        );

        send_and_confirm(&self.rpc_client, &instructions, owner, &self.send_settings).await
    }
}
