//! Message types for the bridge contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};
use cw20::Cw20ReceiveMsg;

use common::{AssetInfo, TimeChallenge};

use crate::state::{NetworkInfo, TokenPair, UnwrapTokenRequest, WrapTokenRequest};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub administrator: String,
    /// Heights a guardian nomination or administrator change must wait
    pub administrator_delay: u64,
    /// Heights a token pair or administrator TSS key change must wait
    pub soft_delay: u64,
    pub min_guardians: u32,
    pub unhalt_duration_in_momentums: u64,
    /// JSON; defaults to `{}`
    pub metadata: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Security
    // ========================================================================
    /// Authorization: administrator
    SetOrchestratorInfo {
        window_size: u64,
        key_gen_threshold: u32,
        confirmations_to_finality: u32,
        estimated_momentum_time: u32,
    },

    /// Replace the guardian set (time challenge, `administrator_delay`).
    ///
    /// Authorization: administrator
    NominateGuardians { guardians: Vec<String> },

    /// Rotate the TSS key.
    ///
    /// Without signatures: administrator only, time challenge with
    /// `soft_delay`. With both signatures: anyone, when the current key signs
    /// the change and the new key proves possession.
    ChangeTssECDSAPubKey {
        /// 33-byte compressed secp256k1 key
        pub_key: Binary,
        old_pub_key_signature: Option<Binary>,
        new_pub_key_signature: Option<Binary>,
    },

    /// Authorization: administrator
    SetAllowKeyGen { allow_key_gen: bool },

    /// Halt the bridge. Without a signature the caller must be the
    /// administrator; otherwise the TSS key must have signed the halt.
    Halt { signature: Option<Binary> },

    /// Authorization: administrator
    Unhalt {},

    /// Remove the administrator and halt. Guardians elect the next one.
    ///
    /// Authorization: administrator
    ActivateEmergency {},

    /// Vote for a new administrator during an emergency.
    ///
    /// Authorization: guardian
    ProposeAdministrator { address: String },

    /// Time challenge with `administrator_delay`.
    ///
    /// Authorization: administrator
    ChangeAdministrator { administrator: String },

    /// Authorization: administrator
    SetBridgeMetadata { metadata: String },

    /// Authorization: administrator
    SetUnhaltDuration { duration: u64 },

    // ========================================================================
    // Network Registry
    // ========================================================================
    /// Create or overwrite a network.
    ///
    /// Authorization: administrator
    SetNetwork {
        network_class: u32,
        chain_id: u32,
        name: String,
        contract_address: String,
        metadata: String,
    },

    /// Remove a network together with its token pairs.
    ///
    /// Authorization: administrator
    RemoveNetwork { network_class: u32, chain_id: u32 },

    /// Authorization: administrator
    SetNetworkMetadata {
        network_class: u32,
        chain_id: u32,
        metadata: String,
    },

    /// Create or replace the pair of `zts` on a network (time challenge,
    /// `soft_delay`).
    ///
    /// Authorization: administrator
    SetTokenPair {
        network_class: u32,
        chain_id: u32,
        zts: AssetInfo,
        token_address: String,
        bridgeable: bool,
        redeemable: bool,
        owned: bool,
        min_amount: Uint128,
        fee_percentage: u32,
        redeem_delay: u64,
        metadata: String,
    },

    /// Authorization: administrator
    RemoveTokenPair {
        network_class: u32,
        chain_id: u32,
        zts: AssetInfo,
        token_address: String,
    },

    // ========================================================================
    // Wrap
    // ========================================================================
    /// Wrap the attached native coin to a foreign network.
    WrapToken {
        network_class: u32,
        chain_id: u32,
        to_address: String,
    },

    /// Wrap CW20 tokens (`ReceiveMsg::WrapToken`).
    Receive(Cw20ReceiveMsg),

    /// Attach or replace the TSS signature of a wrap request.
    UpdateWrapToken { id: Binary, signature: Binary },

    /// Send accumulated wrap fees of a token out of custody.
    ///
    /// Authorization: administrator
    CollectFees {
        zts: AssetInfo,
        recipient: Option<String>,
    },

    // ========================================================================
    // Unwrap
    // ========================================================================
    /// Register a TSS-signed foreign transfer to this chain.
    UnwrapToken {
        network_class: u32,
        chain_id: u32,
        transaction_hash: Binary,
        log_index: u32,
        to_address: String,
        token_address: String,
        amount: Uint128,
        signature: Binary,
    },

    /// Pay out a registered unwrap once its redeem delay has passed.
    RedeemUnwrap {
        transaction_hash: Binary,
        log_index: u32,
    },

    /// Authorization: administrator
    RevokeUnwrapRequest {
        transaction_hash: Binary,
        log_index: u32,
    },
}

/// Payload of a CW20 `Send` to the bridge
#[cw_serde]
pub enum ReceiveMsg {
    WrapToken {
        network_class: u32,
        chain_id: u32,
        to_address: String,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BridgeInfoResponse)]
    BridgeInfo {},

    #[returns(SecurityInfoResponse)]
    SecurityInfo {},

    #[returns(OrchestratorInfoResponse)]
    OrchestratorInfo {},

    #[returns(NetworkResponse)]
    Network { network_class: u32, chain_id: u32 },

    /// Networks ordered by (class, chain id)
    #[returns(NetworksResponse)]
    Networks {
        start_after: Option<(u32, u32)>,
        limit: Option<u32>,
    },

    #[returns(TokenPair)]
    TokenPair {
        network_class: u32,
        chain_id: u32,
        zts: AssetInfo,
    },

    /// Fees accumulated for a token and not yet collected
    #[returns(FeeTokenPairResponse)]
    FeeTokenPair { zts: AssetInfo },

    #[returns(WrapTokenRequest)]
    WrapRequest { id: Binary },

    #[returns(WrapRequestsResponse)]
    WrapRequests {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(UnwrapTokenRequest)]
    UnwrapRequest {
        transaction_hash: Binary,
        log_index: u32,
    },

    #[returns(UnwrapRequestsResponse)]
    UnwrapRequests {
        start_after: Option<(Binary, u32)>,
        limit: Option<u32>,
    },

    /// Pending time challenges
    #[returns(TimeChallengesResponse)]
    TimeChallenges {},
}

#[cw_serde]
pub struct BridgeInfoResponse {
    pub administrator: Option<Addr>,
    pub compressed_tss_pub_key: Option<Binary>,
    pub decompressed_tss_pub_key: Option<Binary>,
    pub allow_key_gen: bool,
    pub halted: bool,
    pub unhalted_at: u64,
    pub unhalt_duration_in_momentums: u64,
    pub tss_nonce: u64,
    pub metadata: String,
    /// TSS key and orchestrator info are both set
    pub initialized: bool,
}

#[cw_serde]
pub struct SecurityInfoResponse {
    pub guardians: Vec<Addr>,
    pub guardians_votes: Vec<Option<Addr>>,
    pub administrator_delay: u64,
    pub soft_delay: u64,
    pub min_guardians: u32,
}

#[cw_serde]
pub struct OrchestratorInfoResponse {
    pub window_size: u64,
    pub key_gen_threshold: u32,
    pub confirmations_to_finality: u32,
    pub estimated_momentum_time: u32,
}

#[cw_serde]
pub struct NetworkResponse {
    pub network: NetworkInfo,
    pub token_pairs: Vec<TokenPair>,
}

#[cw_serde]
pub struct NetworksResponse {
    pub networks: Vec<NetworkResponse>,
}

#[cw_serde]
pub struct FeeTokenPairResponse {
    pub zts: AssetInfo,
    pub accumulated_fee: Uint128,
}

#[cw_serde]
pub struct WrapRequestsResponse {
    pub requests: Vec<WrapTokenRequest>,
}

#[cw_serde]
pub struct UnwrapRequestsResponse {
    pub requests: Vec<UnwrapTokenRequest>,
}

#[cw_serde]
pub struct TimeChallengesResponse {
    pub challenges: Vec<TimeChallenge>,
}
