//! Spork Registry - Entry Points

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdResult,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use common::{bytes32_to_hex, keccak256_fields, parse_hash};

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, IsEnforcedResponse, MigrateMsg, QueryMsg,
    SporkResponse, SporksResponse,
};
use crate::state::{
    Config, Spork, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, CREATOR_NONCES, SPORKS, SPORK_NAMES,
    SPORK_DESCRIPTION_MAX_LENGTH, SPORK_NAME_MAX_LENGTH, SPORK_NAME_MIN_LENGTH,
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

    if msg.activation_delay == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "activation_delay must be greater than zero".to_string(),
        });
    }

    let administrator = deps.api.addr_validate(&msg.administrator)?;
    let governance = msg
        .governance
        .map(|g| deps.api.addr_validate(&g))
        .transpose()?;

    let config = Config {
        administrator,
        governance,
        activation_delay: msg.activation_delay,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("administrator", config.administrator)
        .add_attribute("activation_delay", msg.activation_delay.to_string()))
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
        ExecuteMsg::CreateSpork { name, description } => {
            execute_create_spork(deps, info, name, description)
        }
        ExecuteMsg::ActivateSpork { id } => execute_activate_spork(deps, env, info, id),
        ExecuteMsg::UpdateGovernance { governance } => {
            execute_update_governance(deps, info, governance)
        }
    }
}

fn ensure_spork_authority(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    let is_governance = config.governance.as_ref() == Some(sender);
    if *sender != config.administrator && !is_governance {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

fn validate_spork_text(name: &str, description: &str) -> Result<(), ContractError> {
    if name.len() < SPORK_NAME_MIN_LENGTH || name.len() > SPORK_NAME_MAX_LENGTH {
        return Err(ContractError::ForbiddenParam {
            reason: format!(
                "spork name must be {}-{} bytes",
                SPORK_NAME_MIN_LENGTH, SPORK_NAME_MAX_LENGTH
            ),
        });
    }
    if description.len() > SPORK_DESCRIPTION_MAX_LENGTH {
        return Err(ContractError::ForbiddenParam {
            reason: format!(
                "spork description must be at most {} bytes",
                SPORK_DESCRIPTION_MAX_LENGTH
            ),
        });
    }
    Ok(())
}

pub fn execute_create_spork(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
    description: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_spork_authority(&config, &info.sender)?;
    validate_spork_text(&name, &description)?;

    if SPORK_NAMES.has(deps.storage, &name) {
        return Err(ContractError::SporkAlreadyExists { name });
    }

    let nonce = CREATOR_NONCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    CREATOR_NONCES.save(deps.storage, &info.sender, &(nonce + 1))?;

    let id = keccak256_fields(&[
        name.as_bytes(),
        description.as_bytes(),
        info.sender.as_bytes(),
        &nonce.to_be_bytes(),
    ]);

    let spork = Spork {
        id: Binary::from(id.to_vec()),
        name: name.clone(),
        description,
        activated: false,
        enforcement_height: 0,
    };
    SPORKS.save(deps.storage, &id, &spork)?;
    SPORK_NAMES.save(deps.storage, &name, &spork.id)?;

    Ok(Response::new()
        .add_attribute("method", "create_spork")
        .add_attribute("spork_id", bytes32_to_hex(&id))
        .add_attribute("name", name)
        .add_attribute("creator", info.sender))
}

pub fn execute_activate_spork(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_spork_authority(&config, &info.sender)?;

    let id = parse_hash(&id)?;
    let mut spork = SPORKS
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::SporkNotFound)?;

    if spork.activated {
        return Err(ContractError::SporkAlreadyActivated);
    }

    spork.activated = true;
    spork.enforcement_height = env.block.height.saturating_add(config.activation_delay);
    SPORKS.save(deps.storage, &id, &spork)?;

    Ok(Response::new()
        .add_attribute("method", "activate_spork")
        .add_attribute("spork_id", bytes32_to_hex(&id))
        .add_attribute("enforcement_height", spork.enforcement_height.to_string()))
}

pub fn execute_update_governance(
    deps: DepsMut,
    info: MessageInfo,
    governance: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.administrator {
        return Err(ContractError::Unauthorized);
    }

    config.governance = governance
        .map(|g| deps.api.addr_validate(&g))
        .transpose()?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_governance")
        .add_attribute(
            "governance",
            config
                .governance
                .map(|g| g.to_string())
                .unwrap_or_else(|| "none".to_string()),
        ))
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Spork { id } => to_json_binary(&query_spork(deps, id)?),
        QueryMsg::Sporks { start_after, limit } => {
            to_json_binary(&query_sporks(deps, start_after, limit)?)
        }
        QueryMsg::IsEnforced { id } => to_json_binary(&query_is_enforced(deps, env, id)?),
    }
}

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

fn page_size(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

fn spork_response(spork: Spork) -> SporkResponse {
    SporkResponse {
        id: spork.id,
        name: spork.name,
        description: spork.description,
        activated: spork.activated,
        enforcement_height: spork.enforcement_height,
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        administrator: config.administrator,
        governance: config.governance,
        activation_delay: config.activation_delay,
    })
}

pub fn query_spork(deps: Deps, id: Binary) -> StdResult<SporkResponse> {
    let id = parse_hash(&id)?;
    Ok(spork_response(SPORKS.load(deps.storage, &id)?))
}

pub fn query_sporks(
    deps: Deps,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<SporksResponse> {
    let start = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));

    let sporks = SPORKS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, spork)| spork_response(spork)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(SporksResponse { sporks })
}

pub fn query_is_enforced(deps: Deps, env: Env, id: Binary) -> StdResult<IsEnforcedResponse> {
    let id = parse_hash(&id)?;
    let enforced = SPORKS
        .may_load(deps.storage, &id)?
        .map(|spork| spork.is_enforced(env.block.height))
        .unwrap_or(false);
    Ok(IsEnforcedResponse { enforced })
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
