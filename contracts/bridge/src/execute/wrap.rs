//! Wrap handlers (assets leaving this chain).
//!
//! Non-owned tokens stay in bridge custody. Owned tokens are burned, except
//! for the fee share which stays in custody until collected.

use cosmwasm_std::{
    from_json, Addr, Binary, DepsMut, Env, MessageInfo, Response, StdError, Uint128,
};
use cw20::Cw20ReceiveMsg;

use common::{bytes32_to_hex, keccak256_fields, parse_hash, AssetInfo};

use crate::address_codec::validate_foreign_address;
use crate::error::ContractError;
use crate::execute::network::load_network;
use crate::guards::{ensure_administrator, ensure_bridge_initialized, ensure_not_halted};
use crate::hash::{digest_for_network_class, wrap_message};
use crate::msg::ReceiveMsg;
use crate::signature::verify_signature;
use crate::state::{
    WrapTokenRequest, ACCUMULATED_FEES, BRIDGE_INFO, FEE_DENOMINATOR, TOKEN_PAIRS, WRAP_NONCES,
    WRAP_REQUESTS,
};

/// Wrap fee, rounded down.
pub fn compute_fee(amount: Uint128, fee_percentage: u32) -> Uint128 {
    amount.multiply_ratio(fee_percentage, FEE_DENOMINATOR)
}

/// Execute handler for wrapping the attached native coin
pub fn execute_wrap_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    network_class: u32,
    chain_id: u32,
    to_address: String,
) -> Result<Response, ContractError> {
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidTokenOrAmount);
    }
    let coin = &info.funds[0];
    let zts = AssetInfo::Native {
        denom: coin.denom.clone(),
    };

    wrap_token(
        deps,
        env,
        info.sender,
        zts,
        coin.amount,
        network_class,
        chain_id,
        to_address,
    )
}

/// Execute handler for CW20 tokens sent to the bridge
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let zts = AssetInfo::Cw20 {
        contract_addr: info.sender,
    };
    let sender = deps.api.addr_validate(&cw20_msg.sender)?;

    match from_json(&cw20_msg.msg)? {
        ReceiveMsg::WrapToken {
            network_class,
            chain_id,
            to_address,
        } => wrap_token(
            deps,
            env,
            sender,
            zts,
            cw20_msg.amount,
            network_class,
            chain_id,
            to_address,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn wrap_token(
    deps: DepsMut,
    env: Env,
    sender: Addr,
    zts: AssetInfo,
    amount: Uint128,
    network_class: u32,
    chain_id: u32,
    to_address: String,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidTokenOrAmount);
    }

    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_bridge_initialized(deps.as_ref(), &bridge)?;
    ensure_not_halted(&bridge)?;

    load_network(deps.storage, network_class, chain_id)?;
    let zts_key = zts.identifier();
    let pair = TOKEN_PAIRS
        .may_load(deps.storage, (network_class, chain_id, zts_key.as_str()))?
        .ok_or(ContractError::TokenNotFound)?;
    if !pair.bridgeable {
        return Err(ContractError::TokenNotBridgeable);
    }
    if amount < pair.min_amount {
        return Err(ContractError::InvalidMinAmount);
    }
    validate_foreign_address("to_address", &to_address)?;

    let fee = compute_fee(amount, pair.fee_percentage);
    let accumulated = ACCUMULATED_FEES
        .may_load(deps.storage, zts_key.as_str())?
        .unwrap_or_default();
    ACCUMULATED_FEES.save(
        deps.storage,
        zts_key.as_str(),
        &accumulated.checked_add(fee).map_err(StdError::from)?,
    )?;

    let height = env.block.height;
    let nonce = WRAP_NONCES
        .may_load(deps.storage, &sender)?
        .unwrap_or_default();
    WRAP_NONCES.save(deps.storage, &sender, &(nonce + 1))?;
    let id = keccak256_fields(&[
        &network_class.to_be_bytes(),
        &chain_id.to_be_bytes(),
        to_address.as_bytes(),
        pair.token_address.as_bytes(),
        zts_key.as_bytes(),
        &amount.u128().to_be_bytes(),
        &fee.u128().to_be_bytes(),
        sender.as_bytes(),
        &nonce.to_be_bytes(),
        &height.to_be_bytes(),
    ]);
    if WRAP_REQUESTS.has(deps.storage, &id) {
        return Err(ContractError::WrapRequestAlreadyExists);
    }

    let request = WrapTokenRequest {
        id: Binary::from(id.to_vec()),
        network_class,
        chain_id,
        to_address,
        token_standard: zts.clone(),
        token_address: pair.token_address.clone(),
        amount,
        fee,
        signature: Binary::default(),
        creation_momentum_height: height,
    };
    WRAP_REQUESTS.save(deps.storage, &id, &request)?;

    let mut response = Response::new();
    let burned = amount - fee;
    if pair.owned && !burned.is_zero() {
        response = response.add_message(zts.burn_msg(burned)?);
    }

    Ok(response
        .add_attribute("method", "wrap_token")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("sender", sender)
        .add_attribute("network_class", network_class.to_string())
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("to_address", request.to_address)
        .add_attribute("zts", zts_key)
        .add_attribute("token_address", pair.token_address)
        .add_attribute("amount", amount.to_string())
        .add_attribute("fee", fee.to_string())
        .add_attribute("owned", pair.owned.to_string()))
}

/// Attach or replace the TSS signature of a wrap request.
pub fn execute_update_wrap_token(
    deps: DepsMut,
    id: Binary,
    signature: Binary,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_bridge_initialized(deps.as_ref(), &bridge)?;
    ensure_not_halted(&bridge)?;

    let id = parse_hash(&id)?;
    let mut request = WRAP_REQUESTS
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::DataNonExistent)?;
    let network = load_network(deps.storage, request.network_class, request.chain_id)?;

    let message = wrap_message(
        request.network_class,
        request.chain_id,
        &id,
        &request.to_address,
        &request.token_address,
        request.amount,
        request.fee,
        &network.contract_address,
    );
    let digest = digest_for_network_class(&message, request.network_class);
    let tss_key = bridge
        .decompressed_tss_pub_key
        .ok_or(ContractError::BridgeNotInitialized)?;
    verify_signature(deps.api, &digest, &signature, tss_key.as_slice())?;

    request.signature = signature;
    WRAP_REQUESTS.save(deps.storage, &id, &request)?;

    Ok(Response::new()
        .add_attribute("method", "update_wrap_token")
        .add_attribute("id", bytes32_to_hex(&id)))
}

/// Send the accumulated fees of `zts` out of custody and reset the ledger.
pub fn execute_collect_fees(
    deps: DepsMut,
    info: MessageInfo,
    zts: AssetInfo,
    recipient: Option<String>,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    let administrator = ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;

    let recipient = match recipient {
        Some(r) => deps.api.addr_validate(&r)?,
        None => administrator,
    };

    let zts_key = zts.identifier();
    let amount = ACCUMULATED_FEES
        .may_load(deps.storage, zts_key.as_str())?
        .unwrap_or_default();
    if amount.is_zero() {
        return Err(ContractError::InvalidTokenOrAmount);
    }
    ACCUMULATED_FEES.save(deps.storage, zts_key.as_str(), &Uint128::zero())?;

    Ok(Response::new()
        .add_message(zts.transfer_msg(&recipient, amount)?)
        .add_attribute("method", "collect_fees")
        .add_attribute("zts", zts_key)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount.to_string()))
}
