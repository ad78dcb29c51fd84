//! Governance Contract - Entry Points and Execute Handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    WasmMsg,
};
use cw2::set_contract_version;

use common::pillar::query_pillar;
use common::{bytes32_to_hex, keccak256_fields, parse_hash};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{query_action, query_action_votes, query_actions, query_config};
use crate::state::{
    Action, ActionType, ActionTypeParams, Config, PillarVote, VoteOption, VoteTally, ACTIONS,
    ACTION_DESCRIPTION_MAX_LENGTH, ACTION_NAME_MAX_LENGTH, ACTION_URL_MAX_LENGTH, CONFIG,
    CONTRACT_NAME, CONTRACT_VERSION, VOTES,
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

    validate_action_type_params(&msg.type1)?;
    validate_action_type_params(&msg.type2)?;

    let config = Config {
        pillar_registry: deps.api.addr_validate(&msg.pillar_registry)?,
        proposal_fee: msg.proposal_fee,
        type1: msg.type1,
        type2: msg.type2,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("pillar_registry", config.pillar_registry)
        .add_attribute("proposal_fee", config.proposal_fee.to_string()))
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
        ExecuteMsg::ProposeAction {
            name,
            description,
            url,
            destination,
            payload,
            action_type,
        } => execute_propose_action(
            deps,
            env,
            info,
            name,
            description,
            url,
            destination,
            payload,
            action_type.unwrap_or(ActionType::Type1),
        ),
        ExecuteMsg::VoteByName {
            action_id,
            pillar_name,
            vote,
        } => execute_vote_by_name(deps, env, info, action_id, pillar_name, vote),
        ExecuteMsg::ExecuteAction { action_id } => execute_execute_action(deps, env, action_id),
        ExecuteMsg::UpdateActionTypeParams {
            action_type,
            params,
        } => execute_update_action_type_params(deps, env, info, action_type, params),
    }
}

fn validate_action_type_params(params: &ActionTypeParams) -> Result<(), ContractError> {
    if params.voting_period == 0 {
        return Err(ContractError::ForbiddenParam {
            reason: "voting_period must be greater than zero".to_string(),
        });
    }
    if params.acceptance_threshold == 0 || params.acceptance_threshold > 100 {
        return Err(ContractError::ForbiddenParam {
            reason: "acceptance_threshold must be between 1 and 100".to_string(),
        });
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, min: usize, max: usize) -> Result<(), ContractError> {
    if value.len() < min || value.len() > max {
        return Err(ContractError::ForbiddenParam {
            reason: format!("{} must be {}-{} bytes", field, min, max),
        });
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn execute_propose_action(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    name: String,
    description: String,
    url: String,
    destination: String,
    payload: Binary,
    action_type: ActionType,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // Exactly the proposal fee must be attached (nothing when the fee is zero)
    let fee_paid = if config.proposal_fee.amount.is_zero() {
        info.funds.is_empty()
    } else {
        info.funds.len() == 1 && info.funds[0] == config.proposal_fee
    };
    if !fee_paid {
        return Err(ContractError::InvalidProposalFee {
            expected: config.proposal_fee,
        });
    }

    validate_text("name", &name, 1, ACTION_NAME_MAX_LENGTH)?;
    validate_text("description", &description, 0, ACTION_DESCRIPTION_MAX_LENGTH)?;
    validate_text("url", &url, 1, ACTION_URL_MAX_LENGTH)?;
    if payload.is_empty() {
        return Err(ContractError::ForbiddenParam {
            reason: "payload must not be empty".to_string(),
        });
    }
    let destination = deps.api.addr_validate(&destination)?;

    let creation_timestamp = env.block.time.seconds();
    let id = keccak256_fields(&[
        info.sender.as_bytes(),
        name.as_bytes(),
        description.as_bytes(),
        url.as_bytes(),
        destination.as_bytes(),
        payload.as_slice(),
        &creation_timestamp.to_be_bytes(),
    ]);
    if ACTIONS.has(deps.storage, &id) {
        return Err(ContractError::ActionAlreadyExists);
    }

    let params = config.params(action_type);
    let action = Action {
        id: Binary::from(id.to_vec()),
        owner: info.sender.clone(),
        name,
        description,
        url,
        destination,
        payload,
        creation_timestamp,
        action_type,
        voting_period: params.voting_period,
        acceptance_threshold: params.acceptance_threshold,
        executed: false,
        votes: VoteTally::default(),
    };
    ACTIONS.save(deps.storage, &id, &action)?;

    Ok(Response::new()
        .add_attribute("method", "propose_action")
        .add_attribute("action_id", bytes32_to_hex(&id))
        .add_attribute("owner", info.sender)
        .add_attribute("action_type", action_type.as_str())
        .add_attribute("voting_ends_at", action.voting_ends_at().to_string())
        .add_attribute("destination", action.destination))
}

pub fn execute_vote_by_name(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    action_id: Binary,
    pillar_name: String,
    vote: VoteOption,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let id = parse_hash(&action_id)?;
    let mut action = ACTIONS
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::ActionNotFound)?;

    if action.executed {
        return Err(ContractError::ActionAlreadyExecuted);
    }
    let closed_at = action.voting_ends_at();
    if env.block.time.seconds() >= closed_at {
        return Err(ContractError::VotingClosed { closed_at });
    }

    let pillar = query_pillar(&deps.querier, &config.pillar_registry, &pillar_name)?.ok_or(
        ContractError::PillarNotFound {
            name: pillar_name.clone(),
        },
    )?;
    if pillar.owner != info.sender {
        return Err(ContractError::PermissionDenied {
            pillar: pillar_name,
        });
    }

    // Last vote wins: drop the pillar's previous contribution first
    let vote_key = (id.as_slice(), pillar_name.as_str());
    if let Some(previous) = VOTES.may_load(deps.storage, vote_key)? {
        action.votes.remove(previous.vote, previous.weight);
    }
    action.votes.add(vote, pillar.weight);

    VOTES.save(
        deps.storage,
        vote_key,
        &PillarVote {
            pillar: pillar_name.clone(),
            voter: info.sender.clone(),
            vote,
            weight: pillar.weight,
        },
    )?;
    ACTIONS.save(deps.storage, &id, &action)?;

    Ok(Response::new()
        .add_attribute("method", "vote_by_name")
        .add_attribute("action_id", bytes32_to_hex(&id))
        .add_attribute("pillar", pillar_name)
        .add_attribute("voter", info.sender)
        .add_attribute("vote", vote.as_str())
        .add_attribute("weight", pillar.weight.to_string())
        .add_attribute("yes", action.votes.yes.to_string())
        .add_attribute("no", action.votes.no.to_string())
        .add_attribute("total", action.votes.total.to_string()))
}

pub fn execute_execute_action(
    deps: DepsMut,
    env: Env,
    action_id: Binary,
) -> Result<Response, ContractError> {
    let id = parse_hash(&action_id)?;
    let mut action = ACTIONS
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::ActionNotFound)?;

    if action.executed {
        return Err(ContractError::ActionAlreadyExecuted);
    }
    let now = env.block.time.seconds();
    let ends_at = action.voting_ends_at();
    if now < ends_at {
        return Err(ContractError::VotingPeriodNotEnded { ends_at });
    }
    if !action.is_accepted() {
        return Err(ContractError::ActionExpired);
    }

    action.executed = true;
    ACTIONS.save(deps.storage, &id, &action)?;

    let dispatch = WasmMsg::Execute {
        contract_addr: action.destination.to_string(),
        msg: action.payload.clone(),
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(dispatch)
        .add_attribute("method", "execute_action")
        .add_attribute("action_id", bytes32_to_hex(&id))
        .add_attribute("destination", action.destination)
        .add_attribute("yes", action.votes.yes.to_string())
        .add_attribute("total", action.votes.total.to_string()))
}

pub fn execute_update_action_type_params(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    action_type: ActionType,
    params: ActionTypeParams,
) -> Result<Response, ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::Unauthorized);
    }
    validate_action_type_params(&params)?;

    let mut config = CONFIG.load(deps.storage)?;
    match action_type {
        ActionType::Type1 => config.type1 = params.clone(),
        ActionType::Type2 => config.type2 = params.clone(),
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_action_type_params")
        .add_attribute("action_type", action_type.as_str())
        .add_attribute("voting_period", params.voting_period.to_string())
        .add_attribute(
            "acceptance_threshold",
            params.acceptance_threshold.to_string(),
        ))
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Action { id } => to_json_binary(&query_action(deps, env, id)?),
        QueryMsg::Actions { start_after, limit } => {
            to_json_binary(&query_actions(deps, env, start_after, limit)?)
        }
        QueryMsg::ActionVotes {
            id,
            start_after,
            limit,
        } => to_json_binary(&query_action_votes(deps, id, start_after, limit)?),
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
