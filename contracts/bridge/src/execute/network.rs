//! Network registry handlers.
//!
//! Networks are keyed by `(network_class, chain_id)`; each holds at most one
//! token pair per local asset.

use cosmwasm_std::{DepsMut, Env, MessageInfo, Order, Response, StdResult, Storage};

use common::AssetInfo;

use crate::address_codec::validate_foreign_address;
use crate::error::ContractError;
use crate::guards::{
    ensure_administrator, ensure_not_halted, run_time_challenge, validate_metadata, Challenge,
};
use crate::hash::{sha256, PackedEncoder};
use crate::state::{
    NetworkInfo, TokenPair, BRIDGE_INFO, FEE_DENOMINATOR, NETWORKS, NETWORK_NAME_MAX_LENGTH,
    NETWORK_NAME_MIN_LENGTH, SECURITY_INFO, SET_TOKEN_PAIR_METHOD, TOKEN_PAIRS,
};

fn validate_network_key(network_class: u32, chain_id: u32) -> Result<(), ContractError> {
    if network_class == 0 || chain_id == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "network class and chain id must be non-zero".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn load_network(
    storage: &dyn Storage,
    network_class: u32,
    chain_id: u32,
) -> Result<NetworkInfo, ContractError> {
    NETWORKS
        .may_load(storage, (network_class, chain_id))?
        .ok_or(ContractError::UnknownNetwork {
            network_class,
            chain_id,
        })
}

/// The pair of a network whose foreign token is `token_address`.
pub(crate) fn find_pair_by_token_address(
    storage: &dyn Storage,
    network_class: u32,
    chain_id: u32,
    token_address: &str,
) -> StdResult<Option<TokenPair>> {
    for item in TOKEN_PAIRS
        .prefix((network_class, chain_id))
        .range(storage, None, None, Order::Ascending)
    {
        let (_, pair) = item?;
        if pair.token_address.eq_ignore_ascii_case(token_address) {
            return Ok(Some(pair));
        }
    }
    Ok(None)
}

fn pair_keys(storage: &dyn Storage, network_class: u32, chain_id: u32) -> StdResult<Vec<String>> {
    TOKEN_PAIRS
        .prefix((network_class, chain_id))
        .keys(storage, None, None, Order::Ascending)
        .collect()
}

// ============================================================================
// Networks
// ============================================================================

pub fn execute_set_network(
    deps: DepsMut,
    info: MessageInfo,
    network: NetworkInfo,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;

    validate_network_key(network.network_class, network.chain_id)?;
    if network.name.len() < NETWORK_NAME_MIN_LENGTH
        || network.name.len() > NETWORK_NAME_MAX_LENGTH
        || !network.name.is_ascii()
    {
        return Err(ContractError::ForbiddenParam {
            reason: format!(
                "network name must be {}-{} ASCII characters",
                NETWORK_NAME_MIN_LENGTH, NETWORK_NAME_MAX_LENGTH
            ),
        });
    }
    validate_foreign_address("contract_address", &network.contract_address)?;
    validate_metadata(&network.metadata)?;

    NETWORKS.save(
        deps.storage,
        (network.network_class, network.chain_id),
        &network,
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_network")
        .add_attribute("network_class", network.network_class.to_string())
        .add_attribute("chain_id", network.chain_id.to_string())
        .add_attribute("name", network.name)
        .add_attribute("contract_address", network.contract_address))
}

pub fn execute_remove_network(
    deps: DepsMut,
    info: MessageInfo,
    network_class: u32,
    chain_id: u32,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    load_network(deps.storage, network_class, chain_id)?;

    let keys = pair_keys(deps.storage, network_class, chain_id)?;
    for zts in &keys {
        TOKEN_PAIRS.remove(deps.storage, (network_class, chain_id, zts.as_str()));
    }
    NETWORKS.remove(deps.storage, (network_class, chain_id));

    Ok(Response::new()
        .add_attribute("method", "remove_network")
        .add_attribute("network_class", network_class.to_string())
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("removed_token_pairs", keys.len().to_string()))
}

pub fn execute_set_network_metadata(
    deps: DepsMut,
    info: MessageInfo,
    network_class: u32,
    chain_id: u32,
    metadata: String,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    let mut network = load_network(deps.storage, network_class, chain_id)?;
    validate_metadata(&metadata)?;

    network.metadata = metadata;
    NETWORKS.save(deps.storage, (network_class, chain_id), &network)?;

    Ok(Response::new()
        .add_attribute("method", "set_network_metadata")
        .add_attribute("network_class", network_class.to_string())
        .add_attribute("chain_id", chain_id.to_string()))
}

// ============================================================================
// Token Pairs
// ============================================================================

fn token_pair_params_hash(network_class: u32, chain_id: u32, pair: &TokenPair) -> [u8; 32] {
    let message = PackedEncoder::new()
        .u32(network_class)
        .u32(chain_id)
        .string(&pair.zts.identifier())
        .string(&pair.token_address)
        .u32(u32::from(pair.bridgeable))
        .u32(u32::from(pair.redeemable))
        .u32(u32::from(pair.owned))
        .amount(pair.min_amount)
        .u32(pair.fee_percentage)
        .u64(pair.redeem_delay)
        .string(&pair.metadata)
        .finish();
    sha256(&message)
}

fn validate_token_pair(deps: &DepsMut, pair: &TokenPair) -> Result<(), ContractError> {
    validate_foreign_address("token_address", &pair.token_address)?;
    match &pair.zts {
        AssetInfo::Native { denom } if denom.is_empty() => {
            return Err(ContractError::ForbiddenParam {
                reason: "zts denom must not be empty".to_string(),
            })
        }
        AssetInfo::Native { .. } if pair.owned => {
            return Err(ContractError::ForbiddenParam {
                reason: "owned token pairs must be CW20 tokens".to_string(),
            })
        }
        AssetInfo::Native { .. } => {}
        AssetInfo::Cw20 { contract_addr } => {
            deps.api.addr_validate(contract_addr.as_str())?;
        }
    }
    if pair.fee_percentage > FEE_DENOMINATOR {
        return Err(ContractError::ForbiddenParam {
            reason: format!("fee_percentage must be at most {}", FEE_DENOMINATOR),
        });
    }
    if pair.redeem_delay == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "redeem_delay must be greater than zero".to_string(),
        });
    }
    validate_metadata(&pair.metadata)
}

pub fn execute_set_token_pair(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    network_class: u32,
    chain_id: u32,
    pair: TokenPair,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    load_network(deps.storage, network_class, chain_id)?;
    validate_token_pair(&deps, &pair)?;

    // One asset per foreign token
    let zts_key = pair.zts.identifier();
    if let Some(existing) =
        find_pair_by_token_address(deps.storage, network_class, chain_id, &pair.token_address)?
    {
        let existing_key = existing.zts.identifier();
        if existing_key != zts_key {
            return Err(ContractError::ForbiddenParam {
                reason: format!("token_address already paired with {}", existing_key),
            });
        }
    }

    let security = SECURITY_INFO.load(deps.storage)?;
    match run_time_challenge(
        deps.storage,
        SET_TOKEN_PAIR_METHOD,
        token_pair_params_hash(network_class, chain_id, &pair),
        env.block.height,
        security.soft_delay,
    )? {
        Challenge::Started(response) => return Ok(response),
        Challenge::Due => {}
    }

    TOKEN_PAIRS.save(
        deps.storage,
        (network_class, chain_id, zts_key.as_str()),
        &pair,
    )?;

    Ok(Response::new()
        .add_attribute("method", SET_TOKEN_PAIR_METHOD)
        .add_attribute("time_challenge", "applied")
        .add_attribute("network_class", network_class.to_string())
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("zts", zts_key)
        .add_attribute("token_address", pair.token_address)
        .add_attribute("fee_percentage", pair.fee_percentage.to_string()))
}

pub fn execute_remove_token_pair(
    deps: DepsMut,
    info: MessageInfo,
    network_class: u32,
    chain_id: u32,
    zts: AssetInfo,
    token_address: String,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    load_network(deps.storage, network_class, chain_id)?;

    let zts_key = zts.identifier();
    let key = (network_class, chain_id, zts_key.as_str());
    match TOKEN_PAIRS.may_load(deps.storage, key)? {
        Some(pair) if pair.token_address.eq_ignore_ascii_case(&token_address) => {
            TOKEN_PAIRS.remove(deps.storage, key);
        }
        _ => return Err(ContractError::TokenNotFound),
    }

    Ok(Response::new()
        .add_attribute("method", "remove_token_pair")
        .add_attribute("network_class", network_class.to_string())
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("zts", zts_key)
        .add_attribute("token_address", token_address))
}
