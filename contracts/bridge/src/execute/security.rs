//! Security handlers.
//!
//! This module handles:
//! - Orchestrator parameters, bridge metadata and unhalt duration
//! - Guardian nomination and TSS key rotation
//! - Halt / unhalt and the emergency administrator election
//! - Administrator change

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response};

use crate::error::ContractError;
use crate::guards::{
    ensure_administrator, ensure_not_halted, ensure_security_initialized, is_bridge_initialized,
    run_time_challenge, validate_metadata, Challenge,
};
use crate::hash::{change_tss_message, halt_message, sha256, PackedEncoder};
use crate::signature::{decompress_pubkey, verify_signature};
use crate::state::{
    OrchestratorInfo, BRIDGE_INFO, CHANGE_ADMINISTRATOR_METHOD, CHANGE_TSS_METHOD,
    NOMINATE_GUARDIANS_METHOD, ORCHESTRATOR_INFO, SECURITY_INFO,
};

// ============================================================================
// Configuration
// ============================================================================

pub fn execute_set_orchestrator_info(
    deps: DepsMut,
    info: MessageInfo,
    orchestrator: OrchestratorInfo,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;

    if orchestrator.window_size == 0
        || orchestrator.key_gen_threshold == 0
        || orchestrator.confirmations_to_finality == 0
        || orchestrator.estimated_momentum_time == 0
    {
        return Err(ContractError::ForbiddenParam {
            reason: "orchestrator parameters must be non-zero".to_string(),
        });
    }
    ORCHESTRATOR_INFO.save(deps.storage, &orchestrator)?;

    Ok(Response::new()
        .add_attribute("method", "set_orchestrator_info")
        .add_attribute("window_size", orchestrator.window_size.to_string())
        .add_attribute("key_gen_threshold", orchestrator.key_gen_threshold.to_string())
        .add_attribute(
            "confirmations_to_finality",
            orchestrator.confirmations_to_finality.to_string(),
        )
        .add_attribute(
            "estimated_momentum_time",
            orchestrator.estimated_momentum_time.to_string(),
        ))
}

pub fn execute_set_bridge_metadata(
    deps: DepsMut,
    info: MessageInfo,
    metadata: String,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    validate_metadata(&metadata)?;

    bridge.metadata = metadata;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new().add_attribute("method", "set_bridge_metadata"))
}

pub fn execute_set_unhalt_duration(
    deps: DepsMut,
    info: MessageInfo,
    duration: u64,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;

    bridge.unhalt_duration_in_momentums = duration;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", "set_unhalt_duration")
        .add_attribute("duration", duration.to_string()))
}

// ============================================================================
// Guardians
// ============================================================================

pub fn execute_nominate_guardians(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    guardians: Vec<String>,
) -> Result<Response, ContractError> {
    let bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    let mut security = SECURITY_INFO.load(deps.storage)?;

    let mut nominated = guardians
        .iter()
        .map(|g| deps.api.addr_validate(g))
        .collect::<Result<Vec<_>, _>>()?;
    nominated.sort();
    nominated.dedup();
    if nominated.len() < security.min_guardians as usize {
        return Err(ContractError::ForbiddenParam {
            reason: format!("at least {} guardians required", security.min_guardians),
        });
    }

    let params_hash = sha256(
        &nominated
            .iter()
            .fold(PackedEncoder::new(), |encoder, g| encoder.string(g.as_str()))
            .finish(),
    );
    match run_time_challenge(
        deps.storage,
        NOMINATE_GUARDIANS_METHOD,
        params_hash,
        env.block.height,
        security.administrator_delay,
    )? {
        Challenge::Started(response) => return Ok(response),
        Challenge::Due => {}
    }

    security.guardians = nominated;
    security.reset_votes();
    SECURITY_INFO.save(deps.storage, &security)?;

    Ok(Response::new()
        .add_attribute("method", NOMINATE_GUARDIANS_METHOD)
        .add_attribute("time_challenge", "applied")
        .add_attribute("guardian_count", security.guardians.len().to_string()))
}

// ============================================================================
// TSS Key
// ============================================================================

pub fn execute_change_tss_pub_key(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pub_key: Binary,
    old_pub_key_signature: Option<Binary>,
    new_pub_key_signature: Option<Binary>,
) -> Result<Response, ContractError> {
    let decompressed = decompress_pubkey(pub_key.as_slice())?;

    match (old_pub_key_signature, new_pub_key_signature) {
        (Some(old_sig), Some(new_sig)) => {
            change_tss_by_signature(deps, env, pub_key, decompressed, old_sig, new_sig)
        }
        (None, None) => change_tss_by_administrator(deps, env, info, pub_key, decompressed),
        _ => Err(ContractError::ForbiddenParam {
            reason: "both or neither key signatures must be provided".to_string(),
        }),
    }
}

fn change_tss_by_administrator(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pub_key: Binary,
    decompressed: Vec<u8>,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    let security = SECURITY_INFO.load(deps.storage)?;

    match run_time_challenge(
        deps.storage,
        CHANGE_TSS_METHOD,
        sha256(pub_key.as_slice()),
        env.block.height,
        security.soft_delay,
    )? {
        Challenge::Started(response) => return Ok(response),
        Challenge::Due => {}
    }

    bridge.compressed_tss_pub_key = Some(pub_key.clone());
    bridge.decompressed_tss_pub_key = Some(Binary::from(decompressed));
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", CHANGE_TSS_METHOD)
        .add_attribute("time_challenge", "applied")
        .add_attribute("pub_key", pub_key.to_base64()))
}

/// Key rotation signed by the current TSS key. Works while halted.
fn change_tss_by_signature(
    deps: DepsMut,
    env: Env,
    pub_key: Binary,
    decompressed: Vec<u8>,
    old_sig: Binary,
    new_sig: Binary,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    let current_key = bridge
        .decompressed_tss_pub_key
        .clone()
        .ok_or(ContractError::BridgeNotInitialized)?;
    if is_bridge_initialized(deps.storage, &bridge) && !bridge.allow_key_gen {
        return Err(ContractError::NotAllowedToChangeTss);
    }

    let message = change_tss_message(bridge.tss_nonce, &env.block.chain_id, pub_key.as_slice());
    let digest = sha256(&message);
    verify_signature(deps.api, &digest, &old_sig, current_key.as_slice())?;
    verify_signature(deps.api, &digest, &new_sig, &decompressed)?;

    bridge.tss_nonce += 1;
    bridge.compressed_tss_pub_key = Some(pub_key.clone());
    bridge.decompressed_tss_pub_key = Some(Binary::from(decompressed));
    bridge.allow_key_gen = false;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", CHANGE_TSS_METHOD)
        .add_attribute("path", "signature")
        .add_attribute("pub_key", pub_key.to_base64())
        .add_attribute("tss_nonce", bridge.tss_nonce.to_string()))
}

pub fn execute_set_allow_key_gen(
    deps: DepsMut,
    info: MessageInfo,
    allow_key_gen: bool,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    ensure_security_initialized(&SECURITY_INFO.load(deps.storage)?)?;

    bridge.allow_key_gen = allow_key_gen;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", "set_allow_key_gen")
        .add_attribute("allow_key_gen", allow_key_gen.to_string()))
}

// ============================================================================
// Halt / Unhalt
// ============================================================================

pub fn execute_halt(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    signature: Option<Binary>,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;

    let path = match signature.filter(|s| !s.is_empty()) {
        None => {
            ensure_administrator(&bridge, &info)?;
            if bridge.halted {
                return Err(ContractError::BridgeHalted);
            }
            "administrator"
        }
        Some(signature) => {
            if bridge.halted {
                return Err(ContractError::BridgeHalted);
            }
            let current_key = bridge
                .decompressed_tss_pub_key
                .clone()
                .ok_or(ContractError::BridgeNotInitialized)?;
            let digest = sha256(&halt_message(bridge.tss_nonce, &env.block.chain_id));
            verify_signature(deps.api, &digest, &signature, current_key.as_slice())?;
            bridge.tss_nonce += 1;
            "signature"
        }
    };

    bridge.halted = true;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", "halt")
        .add_attribute("path", path)
        .add_attribute("tss_nonce", bridge.tss_nonce.to_string()))
}

pub fn execute_unhalt(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    if !bridge.halted {
        return Err(ContractError::BridgeNotHalted);
    }

    bridge.halted = false;
    bridge.unhalted_at = env.block.height;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", "unhalt")
        .add_attribute("unhalted_at", env.block.height.to_string()))
}

// ============================================================================
// Emergency & Administrator
// ============================================================================

/// Break-glass: drops the administrator and halts, bypassing time challenges.
pub fn execute_activate_emergency(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    let previous = ensure_administrator(&bridge, &info)?;
    let mut security = SECURITY_INFO.load(deps.storage)?;
    ensure_security_initialized(&security)?;

    bridge.administrator = None;
    bridge.halted = true;
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    security.reset_votes();
    SECURITY_INFO.save(deps.storage, &security)?;

    Ok(Response::new()
        .add_attribute("method", "activate_emergency")
        .add_attribute("previous_administrator", previous))
}

pub fn execute_propose_administrator(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    if !bridge.is_emergency() {
        return Err(ContractError::NotEmergency);
    }
    let mut security = SECURITY_INFO.load(deps.storage)?;
    let index = security
        .guardians
        .iter()
        .position(|g| *g == info.sender)
        .ok_or(ContractError::NotGuardian)?;
    let candidate = deps.api.addr_validate(&address)?;

    security.guardians_votes[index] = Some(candidate.clone());

    let elected = security.unanimous_candidate().cloned();
    if let Some(administrator) = &elected {
        bridge.administrator = Some(administrator.clone());
        BRIDGE_INFO.save(deps.storage, &bridge)?;
        security.reset_votes();
    }
    SECURITY_INFO.save(deps.storage, &security)?;

    Ok(Response::new()
        .add_attribute("method", "propose_administrator")
        .add_attribute("guardian", info.sender)
        .add_attribute("candidate", candidate)
        .add_attribute("elected", elected.is_some().to_string()))
}

pub fn execute_change_administrator(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    administrator: String,
) -> Result<Response, ContractError> {
    let mut bridge = BRIDGE_INFO.load(deps.storage)?;
    ensure_administrator(&bridge, &info)?;
    ensure_not_halted(&bridge)?;
    let security = SECURITY_INFO.load(deps.storage)?;
    let new_admin = deps.api.addr_validate(&administrator)?;

    let params_hash = sha256(&PackedEncoder::new().string(new_admin.as_str()).finish());
    match run_time_challenge(
        deps.storage,
        CHANGE_ADMINISTRATOR_METHOD,
        params_hash,
        env.block.height,
        security.administrator_delay,
    )? {
        Challenge::Started(response) => return Ok(response),
        Challenge::Due => {}
    }

    bridge.administrator = Some(new_admin.clone());
    BRIDGE_INFO.save(deps.storage, &bridge)?;

    Ok(Response::new()
        .add_attribute("method", CHANGE_ADMINISTRATOR_METHOD)
        .add_attribute("time_challenge", "applied")
        .add_attribute("administrator", new_admin))
}
