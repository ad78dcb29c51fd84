//! Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_activate_emergency, execute_change_administrator, execute_change_tss_pub_key,
    execute_collect_fees, execute_halt, execute_nominate_guardians, execute_propose_administrator,
    execute_receive, execute_redeem_unwrap, execute_remove_network, execute_remove_token_pair,
    execute_revoke_unwrap_request, execute_set_allow_key_gen, execute_set_bridge_metadata,
    execute_set_network, execute_set_network_metadata, execute_set_orchestrator_info,
    execute_set_token_pair, execute_set_unhalt_duration, execute_unhalt, execute_unwrap_token,
    execute_update_wrap_token, execute_wrap_native,
};
use crate::guards::validate_metadata;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_bridge_info, query_fee_token_pair, query_network, query_networks,
    query_orchestrator_info, query_security_info, query_time_challenges, query_token_pair,
    query_unwrap_request, query_unwrap_requests, query_wrap_request, query_wrap_requests,
};
use crate::state::{
    BridgeInfo, NetworkInfo, OrchestratorInfo, SecurityInfo, TokenPair, BRIDGE_INFO,
    CONTRACT_NAME, CONTRACT_VERSION, SECURITY_INFO,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let administrator = deps.api.addr_validate(&msg.administrator)?;
    if msg.administrator_delay == 0 || msg.soft_delay == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "administrator_delay and soft_delay must be greater than zero".to_string(),
        });
    }
    if msg.min_guardians == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "min_guardians must be at least 1".to_string(),
        });
    }
    let metadata = msg.metadata.unwrap_or_else(|| "{}".to_string());
    validate_metadata(&metadata)?;

    let bridge = BridgeInfo {
        administrator: Some(administrator.clone()),
        compressed_tss_pub_key: None,
        decompressed_tss_pub_key: None,
        allow_key_gen: false,
        halted: false,
        unhalted_at: 0,
        unhalt_duration_in_momentums: msg.unhalt_duration_in_momentums,
        tss_nonce: 0,
        metadata,
    };
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    SECURITY_INFO.save(
        deps.storage,
        &SecurityInfo {
            guardians: vec![],
            guardians_votes: vec![],
            administrator_delay: msg.administrator_delay,
            soft_delay: msg.soft_delay,
            min_guardians: msg.min_guardians,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("administrator", administrator)
        .add_attribute("administrator_delay", msg.administrator_delay.to_string())
        .add_attribute("soft_delay", msg.soft_delay.to_string())
        .add_attribute("min_guardians", msg.min_guardians.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Security
        ExecuteMsg::SetOrchestratorInfo {
            window_size,
            key_gen_threshold,
            confirmations_to_finality,
            estimated_momentum_time,
        } => execute_set_orchestrator_info(
            deps,
            info,
            OrchestratorInfo {
                window_size,
                key_gen_threshold,
                confirmations_to_finality,
                estimated_momentum_time,
            },
        ),
        ExecuteMsg::NominateGuardians { guardians } => {
            execute_nominate_guardians(deps, env, info, guardians)
        }
        ExecuteMsg::ChangeTssECDSAPubKey {
            pub_key,
            old_pub_key_signature,
            new_pub_key_signature,
        } => execute_change_tss_pub_key(
            deps,
            env,
            info,
            pub_key,
            old_pub_key_signature,
            new_pub_key_signature,
        ),
        ExecuteMsg::SetAllowKeyGen { allow_key_gen } => {
            execute_set_allow_key_gen(deps, info, allow_key_gen)
        }
        ExecuteMsg::Halt { signature } => execute_halt(deps, env, info, signature),
        ExecuteMsg::Unhalt {} => execute_unhalt(deps, env, info),
        ExecuteMsg::ActivateEmergency {} => execute_activate_emergency(deps, info),
        ExecuteMsg::ProposeAdministrator { address } => {
            execute_propose_administrator(deps, info, address)
        }
        ExecuteMsg::ChangeAdministrator { administrator } => {
            execute_change_administrator(deps, env, info, administrator)
        }
        ExecuteMsg::SetBridgeMetadata { metadata } => {
            execute_set_bridge_metadata(deps, info, metadata)
        }
        ExecuteMsg::SetUnhaltDuration { duration } => {
            execute_set_unhalt_duration(deps, info, duration)
        }

        // Network registry
        ExecuteMsg::SetNetwork {
            network_class,
            chain_id,
            name,
            contract_address,
            metadata,
        } => execute_set_network(
            deps,
            info,
            NetworkInfo {
                network_class,
                chain_id,
                name,
                contract_address,
                metadata,
            },
        ),
        ExecuteMsg::RemoveNetwork {
            network_class,
            chain_id,
        } => execute_remove_network(deps, info, network_class, chain_id),
        ExecuteMsg::SetNetworkMetadata {
            network_class,
            chain_id,
            metadata,
        } => execute_set_network_metadata(deps, info, network_class, chain_id, metadata),
        ExecuteMsg::SetTokenPair {
            network_class,
            chain_id,
            zts,
            token_address,
            bridgeable,
            redeemable,
            owned,
            min_amount,
            fee_percentage,
            redeem_delay,
            metadata,
        } => execute_set_token_pair(
            deps,
            env,
            info,
            network_class,
            chain_id,
            TokenPair {
                zts,
                token_address,
                bridgeable,
                redeemable,
                owned,
                min_amount,
                fee_percentage,
                redeem_delay,
                metadata,
            },
        ),
        ExecuteMsg::RemoveTokenPair {
            network_class,
            chain_id,
            zts,
            token_address,
        } => execute_remove_token_pair(deps, info, network_class, chain_id, zts, token_address),

        // Wrap
        ExecuteMsg::WrapToken {
            network_class,
            chain_id,
            to_address,
        } => execute_wrap_native(deps, env, info, network_class, chain_id, to_address),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),
        ExecuteMsg::UpdateWrapToken { id, signature } => {
            execute_update_wrap_token(deps, id, signature)
        }
        ExecuteMsg::CollectFees { zts, recipient } => {
            execute_collect_fees(deps, info, zts, recipient)
        }

        // Unwrap
        ExecuteMsg::UnwrapToken {
            network_class,
            chain_id,
            transaction_hash,
            log_index,
            to_address,
            token_address,
            amount,
            signature,
        } => execute_unwrap_token(
            deps,
            env,
            network_class,
            chain_id,
            transaction_hash,
            log_index,
            to_address,
            token_address,
            amount,
            signature,
        ),
        ExecuteMsg::RedeemUnwrap {
            transaction_hash,
            log_index,
        } => execute_redeem_unwrap(deps, env, transaction_hash, log_index),
        ExecuteMsg::RevokeUnwrapRequest {
            transaction_hash,
            log_index,
        } => execute_revoke_unwrap_request(deps, info, transaction_hash, log_index),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::BridgeInfo {} => to_json_binary(&query_bridge_info(deps)?),
        QueryMsg::SecurityInfo {} => to_json_binary(&query_security_info(deps)?),
        QueryMsg::OrchestratorInfo {} => to_json_binary(&query_orchestrator_info(deps)?),
        QueryMsg::Network {
            network_class,
            chain_id,
        } => to_json_binary(&query_network(deps, network_class, chain_id)?),
        QueryMsg::Networks { start_after, limit } => {
            to_json_binary(&query_networks(deps, start_after, limit)?)
        }
        QueryMsg::TokenPair {
            network_class,
            chain_id,
            zts,
        } => to_json_binary(&query_token_pair(deps, network_class, chain_id, zts)?),
        QueryMsg::FeeTokenPair { zts } => to_json_binary(&query_fee_token_pair(deps, zts)?),
        QueryMsg::WrapRequest { id } => to_json_binary(&query_wrap_request(deps, id)?),
        QueryMsg::WrapRequests { start_after, limit } => {
            to_json_binary(&query_wrap_requests(deps, start_after, limit)?)
        }
        QueryMsg::UnwrapRequest {
            transaction_hash,
            log_index,
        } => to_json_binary(&query_unwrap_request(deps, transaction_hash, log_index)?),
        QueryMsg::UnwrapRequests { start_after, limit } => {
            to_json_binary(&query_unwrap_requests(deps, start_after, limit)?)
        }
        QueryMsg::TimeChallenges {} => to_json_binary(&query_time_challenges(deps)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
