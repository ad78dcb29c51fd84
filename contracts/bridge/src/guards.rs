//! Precondition checks shared by the execute handlers.

use cosmwasm_std::{Addr, Deps, MessageInfo, Response, Storage};
use serde::de::IgnoredAny;

use common::{ChallengeStatus, TIME_CHALLENGE_STARTED};

use crate::error::ContractError;
use crate::state::{BridgeInfo, SecurityInfo, ORCHESTRATOR_INFO, TIME_CHALLENGES};

/// Administrator gate. Always fails in emergency mode.
pub fn ensure_administrator(bridge: &BridgeInfo, info: &MessageInfo) -> Result<Addr, ContractError> {
    match &bridge.administrator {
        Some(admin) if *admin == info.sender => Ok(admin.clone()),
        _ => Err(ContractError::PermissionDenied),
    }
}

pub fn ensure_not_halted(bridge: &BridgeInfo) -> Result<(), ContractError> {
    if bridge.halted {
        return Err(ContractError::BridgeHalted);
    }
    Ok(())
}

pub fn ensure_security_initialized(security: &SecurityInfo) -> Result<(), ContractError> {
    if !security.is_initialized() {
        return Err(ContractError::SecurityNotInitialized);
    }
    Ok(())
}

/// A TSS key is set and the orchestrator parameters are configured.
pub fn is_bridge_initialized(storage: &dyn Storage, bridge: &BridgeInfo) -> bool {
    bridge.decompressed_tss_pub_key.is_some() && ORCHESTRATOR_INFO.exists(storage)
}

pub fn ensure_bridge_initialized(deps: Deps, bridge: &BridgeInfo) -> Result<(), ContractError> {
    if !is_bridge_initialized(deps.storage, bridge) {
        return Err(ContractError::BridgeNotInitialized);
    }
    Ok(())
}

/// Metadata strings must be well-formed JSON.
pub fn validate_metadata(metadata: &str) -> Result<(), ContractError> {
    cosmwasm_std::from_json::<IgnoredAny>(metadata.as_bytes())
        .map(|_| ())
        .map_err(|_| ContractError::InvalidJson)
}

/// Outcome of running a sensitive change through its time challenge.
pub enum Challenge {
    /// The change may be applied now.
    Due,
    /// The challenge was (re)started; return this response without applying.
    Started(Response),
}

pub fn run_time_challenge(
    storage: &mut dyn Storage,
    method_name: &'static str,
    params_hash: [u8; 32],
    current_height: u64,
    required_delay: u64,
) -> Result<Challenge, ContractError> {
    match TIME_CHALLENGES.start_or_check(
        storage,
        method_name,
        params_hash,
        current_height,
        required_delay,
    )? {
        ChallengeStatus::Due => Ok(Challenge::Due),
        ChallengeStatus::NotDue { due_at } => Err(ContractError::TimeChallengeNotDue { due_at }),
        ChallengeStatus::Started { due_at } => Ok(Challenge::Started(
            Response::new()
                .add_attribute("method", method_name)
                .add_attribute("time_challenge", TIME_CHALLENGE_STARTED)
                .add_attribute("due_at", due_at.to_string()),
        )),
    }
}
