//! Unwrap handlers (assets arriving from foreign networks).
//!
//! A foreign transfer is registered once per `(transaction_hash, log_index)`
//! with a TSS signature, then redeemed after the pair's redeem delay.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Uint128};

use common::{bytes32_to_hex, parse_hash};

use crate::address_codec::validate_foreign_address;
use crate::error::ContractError;
use crate::execute::network::{find_pair_by_token_address, load_network};
use crate::guards::{ensure_administrator, ensure_bridge_initialized, ensure_not_halted};
use crate::hash::{digest_for_network_class, unwrap_message};
use crate::signature::verify_signature;
use crate::state::{UnwrapTokenRequest, BRIDGE_INFO, UNWRAP_REQUESTS};

#[allow(clippy::too_many_arguments)]
pub fn execute_unwrap_token(
    deps: DepsMut,
    env: Env,
    network_class: u32,
    chain_id: u32,
    transaction_hash: Binary,
    log_index: u32,
    to_address: String,
    token_address: String,
    amount: Uint128,
    signature: Binary,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidTokenOrAmount);
    }

    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_bridge_initialized(deps.as_ref(), &bridge)?;
    ensure_not_halted(&bridge)?;

    load_network(deps.storage, network_class, chain_id)?;
    let tx_hash = parse_hash(&transaction_hash)?;
    let recipient = deps.api.addr_validate(&to_address)?;
    validate_foreign_address("token_address", &token_address)?;

    if UNWRAP_REQUESTS.has(deps.storage, (tx_hash.as_slice(), log_index)) {
        return Err(ContractError::UnwrapRequestAlreadyRegistered);
    }

    let message = unwrap_message(
        network_class,
        chain_id,
        &tx_hash,
        log_index,
        &to_address,
        &token_address,
        amount,
    );
    let digest = digest_for_network_class(&message, network_class);
    let tss_key = bridge
        .decompressed_tss_pub_key
        .ok_or(ContractError::BridgeNotInitialized)?;
    verify_signature(deps.api, &digest, &signature, tss_key.as_slice())?;

    let pair = find_pair_by_token_address(deps.storage, network_class, chain_id, &token_address)?
        .ok_or(ContractError::TokenNotFound)?;
    if !pair.redeemable {
        return Err(ContractError::TokenNotRedeemable);
    }

    let request = UnwrapTokenRequest {
        registration_momentum_height: env.block.height,
        network_class,
        chain_id,
        transaction_hash: Binary::from(tx_hash.to_vec()),
        log_index,
        to_address: recipient,
        token_address,
        token_standard: pair.zts.clone(),
        amount,
        signature,
        redeemed: false,
        revoked: false,
    };
    UNWRAP_REQUESTS.save(deps.storage, (tx_hash.as_slice(), log_index), &request)?;

    Ok(Response::new()
        .add_attribute("method", "unwrap_token")
        .add_attribute("transaction_hash", bytes32_to_hex(&tx_hash))
        .add_attribute("log_index", log_index.to_string())
        .add_attribute("to_address", request.to_address)
        .add_attribute("zts", pair.zts.identifier())
        .add_attribute("amount", amount.to_string())
        .add_attribute(
            "redeemable_at",
            env.block.height.saturating_add(pair.redeem_delay).to_string(),
        ))
}

/// Pay out a registered unwrap. The token pair is resolved against the
/// current registry, so removing the network or pair blocks redemption.
pub fn execute_redeem_unwrap(
    deps: DepsMut,
    env: Env,
    transaction_hash: Binary,
    log_index: u32,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_bridge_initialized(deps.as_ref(), &bridge)?;
    ensure_not_halted(&bridge)?;

    let tx_hash = parse_hash(&transaction_hash)?;
    let key = (tx_hash.as_slice(), log_index);
    let mut request = UNWRAP_REQUESTS
        .may_load(deps.storage, key)?
        .ok_or(ContractError::DataNonExistent)?;
    if request.redeemed || request.revoked {
        return Err(ContractError::InvalidRedeemRequest);
    }

    load_network(deps.storage, request.network_class, request.chain_id)?;
    let pair = find_pair_by_token_address(
        deps.storage,
        request.network_class,
        request.chain_id,
        &request.token_address,
    )?
    .ok_or(ContractError::TokenNotFound)?;
    if !pair.redeemable {
        return Err(ContractError::TokenNotRedeemable);
    }

    let redeemable_at = request
        .registration_momentum_height
        .saturating_add(pair.redeem_delay);
    if env.block.height < redeemable_at {
        return Err(ContractError::InvalidRedeemPeriod { redeemable_at });
    }

    request.redeemed = true;
    UNWRAP_REQUESTS.save(deps.storage, key, &request)?;

    let payout = if pair.owned {
        pair.zts.mint_msg(&request.to_address, request.amount)?
    } else {
        pair.zts.transfer_msg(&request.to_address, request.amount)?
    };

    Ok(Response::new()
        .add_message(payout)
        .add_attribute("method", "redeem_unwrap")
        .add_attribute("transaction_hash", bytes32_to_hex(&tx_hash))
        .add_attribute("log_index", log_index.to_string())
        .add_attribute("to_address", request.to_address)
        .add_attribute("zts", pair.zts.identifier())
        .add_attribute("amount", request.amount.to_string())
        .add_attribute("owned", pair.owned.to_string()))
}

/// Permanently block an unwrap request. Usable while halted.
pub fn execute_revoke_unwrap_request(
    deps: DepsMut,
    info: MessageInfo,
    transaction_hash: Binary,
    log_index: u32,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;

    let tx_hash = parse_hash(&transaction_hash)?;
    let key = (tx_hash.as_slice(), log_index);
    let mut request = UNWRAP_REQUESTS
        .may_load(deps.storage, key)?
        .ok_or(ContractError::DataNonExistent)?;
    if request.redeemed || request.revoked {
        return Err(ContractError::InvalidRedeemRequest);
    }

    request.revoked = true;
    UNWRAP_REQUESTS.save(deps.storage, key, &request)?;

    Ok(Response::new()
        .add_attribute("method", "revoke_unwrap_request")
        .add_attribute("transaction_hash", bytes32_to_hex(&tx_hash))
        .add_attribute("log_index", log_index.to_string()))
}
