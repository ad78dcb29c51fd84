//! Query handlers for the bridge contract.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use common::{parse_hash, AssetInfo};

use crate::guards::is_bridge_initialized;
use crate::msg::{
    BridgeInfoResponse, FeeTokenPairResponse, NetworkResponse, NetworksResponse,
    OrchestratorInfoResponse, SecurityInfoResponse, TimeChallengesResponse,
    UnwrapRequestsResponse, WrapRequestsResponse,
};
use crate::state::{
    NetworkInfo, TokenPair, UnwrapTokenRequest, WrapTokenRequest, ACCUMULATED_FEES, BRIDGE_INFO,
    NETWORKS, ORCHESTRATOR_INFO, SECURITY_INFO, TIME_CHALLENGES, TOKEN_PAIRS, UNWRAP_REQUESTS,
    WRAP_REQUESTS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

fn page_size(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

// ============================================================================
// Security
// ============================================================================

pub fn query_bridge_info(deps: Deps) -> StdResult<BridgeInfoResponse> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    let initialized = is_bridge_initialized(deps.storage, &bridge);
    Ok(BridgeInfoResponse {
        administrator: bridge.administrator,
        compressed_tss_pub_key: bridge.compressed_tss_pub_key,
        decompressed_tss_pub_key: bridge.decompressed_tss_pub_key,
        allow_key_gen: bridge.allow_key_gen,
        halted: bridge.halted,
        unhalted_at: bridge.unhalted_at,
        unhalt_duration_in_momentums: bridge.unhalt_duration_in_momentums,
        tss_nonce: bridge.tss_nonce,
        metadata: bridge.metadata,
        initialized,
    })
}

pub fn query_security_info(deps: Deps) -> StdResult<SecurityInfoResponse> {
    let security = SECURITY_INFO.load(deps.storage)?;
    Ok(SecurityInfoResponse {
        guardians: security.guardians,
        guardians_votes: security.guardians_votes,
        administrator_delay: security.administrator_delay,
        soft_delay: security.soft_delay,
        min_guardians: security.min_guardians,
    })
}

/// All zero until the administrator sets the orchestrator parameters.
pub fn query_orchestrator_info(deps: Deps) -> StdResult<OrchestratorInfoResponse> {
    let info = ORCHESTRATOR_INFO
        .may_load(deps.storage)?
        .unwrap_or_default();
    Ok(OrchestratorInfoResponse {
        window_size: info.window_size,
        key_gen_threshold: info.key_gen_threshold,
        confirmations_to_finality: info.confirmations_to_finality,
        estimated_momentum_time: info.estimated_momentum_time,
    })
}

pub fn query_time_challenges(deps: Deps) -> StdResult<TimeChallengesResponse> {
    Ok(TimeChallengesResponse {
        challenges: TIME_CHALLENGES.pending(deps.storage)?,
    })
}

// ============================================================================
// Networks
// ============================================================================

fn network_response(deps: Deps, network: NetworkInfo) -> StdResult<NetworkResponse> {
    let token_pairs = TOKEN_PAIRS
        .prefix((network.network_class, network.chain_id))
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, pair)| pair))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(NetworkResponse {
        network,
        token_pairs,
    })
}

pub fn query_network(deps: Deps, network_class: u32, chain_id: u32) -> StdResult<NetworkResponse> {
    let network = NETWORKS.load(deps.storage, (network_class, chain_id))?;
    network_response(deps, network)
}

pub fn query_networks(
    deps: Deps,
    start_after: Option<(u32, u32)>,
    limit: Option<u32>,
) -> StdResult<NetworksResponse> {
    let start = start_after.map(Bound::exclusive);

    let networks = NETWORKS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.and_then(|(_, network)| network_response(deps, network)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(NetworksResponse { networks })
}

pub fn query_token_pair(
    deps: Deps,
    network_class: u32,
    chain_id: u32,
    zts: AssetInfo,
) -> StdResult<TokenPair> {
    TOKEN_PAIRS
        .may_load(
            deps.storage,
            (network_class, chain_id, zts.identifier().as_str()),
        )?
        .ok_or_else(|| StdError::not_found("token pair"))
}

pub fn query_fee_token_pair(deps: Deps, zts: AssetInfo) -> StdResult<FeeTokenPairResponse> {
    let accumulated_fee = ACCUMULATED_FEES
        .may_load(deps.storage, zts.identifier().as_str())?
        .unwrap_or_default();
    Ok(FeeTokenPairResponse {
        zts,
        accumulated_fee,
    })
}

// ============================================================================
// Requests
// ============================================================================

pub fn query_wrap_request(deps: Deps, id: Binary) -> StdResult<WrapTokenRequest> {
    let id = parse_hash(&id)?;
    WRAP_REQUESTS.load(deps.storage, &id)
}

/// Paginated wrap requests, ordered by id.
pub fn query_wrap_requests(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<WrapRequestsResponse> {
    let start = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));

    let requests = WRAP_REQUESTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, request)| request))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(WrapRequestsResponse { requests })
}

pub fn query_unwrap_request(
    deps: Deps,
    transaction_hash: Binary,
    log_index: u32,
) -> StdResult<UnwrapTokenRequest> {
    let tx_hash = parse_hash(&transaction_hash)?;
    UNWRAP_REQUESTS.load(deps.storage, (tx_hash.as_slice(), log_index))
}

/// Paginated unwrap requests, ordered by (transaction hash, log index).
pub fn query_unwrap_requests(
    deps: Deps,
    start_after: Option<(Binary, u32)>,
    limit: Option<u32>,
) -> StdResult<UnwrapRequestsResponse> {
    let start = start_after
        .as_ref()
        .map(|(hash, log_index)| Bound::exclusive((hash.as_slice(), *log_index)));

    let requests = UNWRAP_REQUESTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, request)| request))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(UnwrapRequestsResponse { requests })
}
