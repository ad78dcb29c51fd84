//! State definitions for the bridge contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

use common::{AssetInfo, TimeChallengeLedger};

// ============================================================================
// Security State
// ============================================================================

#[cw_serde]
pub struct BridgeInfo {
    /// `None` while the bridge is in emergency mode
    pub administrator: Option<Addr>,
    /// 33-byte SEC1 compressed TSS public key
    pub compressed_tss_pub_key: Option<Binary>,
    /// 65-byte uncompressed form of the same key, as returned by recovery
    pub decompressed_tss_pub_key: Option<Binary>,
    pub allow_key_gen: bool,
    pub halted: bool,
    /// Height of the last unhalt
    pub unhalted_at: u64,
    pub unhalt_duration_in_momentums: u64,
    /// Anti-replay counter bound into every TSS-signed halt or key change
    pub tss_nonce: u64,
    pub metadata: String,
}

impl BridgeInfo {
    pub fn is_emergency(&self) -> bool {
        self.administrator.is_none()
    }
}

#[cw_serde]
pub struct SecurityInfo {
    /// Sorted, unique
    pub guardians: Vec<Addr>,
    /// Parallel to `guardians`; `None` means no vote
    pub guardians_votes: Vec<Option<Addr>>,
    pub administrator_delay: u64,
    pub soft_delay: u64,
    pub min_guardians: u32,
}

impl SecurityInfo {
    pub fn is_initialized(&self) -> bool {
        !self.guardians.is_empty()
    }

    pub fn reset_votes(&mut self) {
        self.guardians_votes = vec![None; self.guardians.len()];
    }

    /// The candidate every guardian voted for, if the vote is unanimous.
    pub fn unanimous_candidate(&self) -> Option<&Addr> {
        let first = self.guardians_votes.first()?.as_ref()?;
        self.guardians_votes
            .iter()
            .all(|vote| vote.as_ref() == Some(first))
            .then_some(first)
    }
}

#[cw_serde]
#[derive(Default)]
pub struct OrchestratorInfo {
    pub window_size: u64,
    pub key_gen_threshold: u32,
    pub confirmations_to_finality: u32,
    pub estimated_momentum_time: u32,
}

// ============================================================================
// Network Registry
// ============================================================================

#[cw_serde]
pub struct NetworkInfo {
    pub network_class: u32,
    pub chain_id: u32,
    pub name: String,
    /// Bridge contract on the foreign network
    pub contract_address: String,
    pub metadata: String,
}

#[cw_serde]
pub struct TokenPair {
    /// Asset on this chain
    pub zts: AssetInfo,
    /// Token on the foreign network
    pub token_address: String,
    pub bridgeable: bool,
    pub redeemable: bool,
    /// The bridge mints and burns this token instead of holding it
    pub owned: bool,
    pub min_amount: Uint128,
    /// Out of `FEE_DENOMINATOR`
    pub fee_percentage: u32,
    /// Heights between unwrap registration and redemption
    pub redeem_delay: u64,
    pub metadata: String,
}

// ============================================================================
// Request Ledgers
// ============================================================================

#[cw_serde]
pub struct WrapTokenRequest {
    pub id: Binary,
    pub network_class: u32,
    pub chain_id: u32,
    pub to_address: String,
    pub token_standard: AssetInfo,
    pub token_address: String,
    /// Amount sent by the user, fee included
    pub amount: Uint128,
    pub fee: Uint128,
    /// Empty until an orchestrator attaches the TSS signature
    pub signature: Binary,
    pub creation_momentum_height: u64,
}

#[cw_serde]
pub struct UnwrapTokenRequest {
    pub registration_momentum_height: u64,
    pub network_class: u32,
    pub chain_id: u32,
    pub transaction_hash: Binary,
    pub log_index: u32,
    pub to_address: Addr,
    pub token_address: String,
    /// Resolved from the token pair at registration
    pub token_standard: AssetInfo,
    pub amount: Uint128,
    pub signature: Binary,
    pub redeemed: bool,
    pub revoked: bool,
}

// ============================================================================
// Constants
// ============================================================================

pub const CONTRACT_NAME: &str = "crates.io:bridge";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 10000 = 100.00%
pub const FEE_DENOMINATOR: u32 = 10_000;

pub const NETWORK_NAME_MIN_LENGTH: usize = 2;
pub const NETWORK_NAME_MAX_LENGTH: usize = 40;

/// Method names keying the time challenges and bound into TSS messages
pub const NOMINATE_GUARDIANS_METHOD: &str = "NominateGuardians";
pub const CHANGE_TSS_METHOD: &str = "ChangeTssECDSAPubKey";
pub const CHANGE_ADMINISTRATOR_METHOD: &str = "ChangeAdministrator";
pub const SET_TOKEN_PAIR_METHOD: &str = "SetTokenPair";
pub const HALT_METHOD: &str = "Halt";

// ============================================================================
// Storage
// ============================================================================

pub const BRIDGE_INFO: Item<BridgeInfo> = Item::new("bridge_info");
pub const SECURITY_INFO: Item<SecurityInfo> = Item::new("security_info");
/// Absent until the administrator sets it
pub const ORCHESTRATOR_INFO: Item<OrchestratorInfo> = Item::new("orchestrator_info");

/// Key: (network class, chain id)
pub const NETWORKS: Map<(u32, u32), NetworkInfo> = Map::new("networks");

/// Key: (network class, chain id, zts identifier)
pub const TOKEN_PAIRS: Map<(u32, u32, &str), TokenPair> = Map::new("token_pairs");

/// Accumulated wrap fees awaiting collection. Key: zts identifier
pub const ACCUMULATED_FEES: Map<&str, Uint128> = Map::new("accumulated_fees");

/// Key: 32-byte request id
pub const WRAP_REQUESTS: Map<&[u8], WrapTokenRequest> = Map::new("wrap_requests");

/// Number of wraps each sender has made, mixed into new request ids
pub const WRAP_NONCES: Map<&Addr, u64> = Map::new("wrap_nonces");

/// Key: (32-byte foreign transaction hash, log index)
pub const UNWRAP_REQUESTS: Map<(&[u8], u32), UnwrapTokenRequest> = Map::new("unwrap_requests");

pub const TIME_CHALLENGES: TimeChallengeLedger = TimeChallengeLedger::new("time_challenges");
