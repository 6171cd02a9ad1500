//! Mock adapters shared by the tool and server tests.

use async_trait::async_trait;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::markets::dlmm::DlmmChain;
use crate::markets::errors::{DlmmError, DlmmResult};
use crate::markets::meteora::DlmmApi;
use crate::markets::types::{ActiveBin, ClaimableFees, PairInfo, PositionSummary};
use crate::telemetry::Metrics;
use crate::tools::ToolContext;

fn unavailable(what: &str) -> DlmmError {
    DlmmError::Status {
        url: format!("mock://{}", what),
        status: 503,
    }
}

#[derive(Default)]
pub(crate) struct MockApi {
    pub pairs: Option<Vec<PairInfo>>,
    pub pair: Option<PairInfo>,
    pub user_positions: Option<Value>,
    pub calls: AtomicUsize,
}

impl MockApi {
    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DlmmApi for MockApi {
    async fn all_pairs(&self) -> DlmmResult<Vec<PairInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pairs.clone().ok_or_else(|| unavailable("pair/all"))
    }

    async fn pair(&self, _address: &str) -> DlmmResult<PairInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pair.clone().ok_or_else(|| unavailable("pair"))
    }

    async fn user_positions(&self, _wallet: &str) -> DlmmResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user_positions.clone().ok_or_else(|| unavailable("user"))
    }
}

#[derive(Default)]
pub(crate) struct MockChain {
    pub positions: Option<Vec<PositionSummary>>,
    pub active_bin: Option<ActiveBin>,
    pub fees: Option<ClaimableFees>,
    pub signature: Option<Signature>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl DlmmChain for MockChain {
    async fn positions_by_owner(&self, _owner: &Pubkey) -> DlmmResult<Vec<PositionSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.positions
            .clone()
            .ok_or_else(|| DlmmError::Transaction("rpc restricted".to_string()))
    }

    async fn active_bin(&self, _lb_pair: &Pubkey) -> DlmmResult<ActiveBin> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.active_bin.clone().ok_or_else(|| DlmmError::AccountNotFound {
            address: "pool".to_string(),
        })
    }

    async fn claimable_fees(
        &self,
        _lb_pair: &Pubkey,
        _position: &Pubkey,
    ) -> DlmmResult<ClaimableFees> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fees
            .ok_or_else(|| DlmmError::Transaction("rpc restricted".to_string()))
    }

    async fn claim_fees(
        &self,
        _lb_pair: &Pubkey,
        _position: &Pubkey,
        _owner: &Keypair,
    ) -> DlmmResult<Signature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.signature
            .ok_or_else(|| DlmmError::Transaction("blockhash not found".to_string()))
    }
}

/// Builds a context and hands back the concrete mocks so tests can read their counters.
pub(crate) fn context_with(
    api: MockApi,
    chain: MockChain,
    wallet: Option<Keypair>,
) -> (ToolContext, Arc<MockApi>, Arc<MockChain>) {
    let api = Arc::new(api);
    let chain = Arc::new(chain);
    let ctx = ToolContext {
        api: api.clone(),
        chain: chain.clone(),
        wallet: wallet.map(Arc::new),
        metrics: Metrics::new(),
    };
    (ctx, api, chain)
}

pub(crate) fn context(api: MockApi, chain: MockChain, wallet: Option<Keypair>) -> ToolContext {
    context_with(api, chain, wallet).0
}

pub(crate) fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
