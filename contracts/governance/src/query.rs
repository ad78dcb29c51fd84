//! Query handlers for the governance contract.

use cosmwasm_std::{Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use common::parse_hash;

use crate::msg::{
    ActionResponse, ActionVotesResponse, ActionsResponse, ConfigResponse, PillarVoteResponse,
};
use crate::state::{Action, ACTIONS, CONFIG, VOTES};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

fn page_size(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

fn action_response(action: Action, now: u64) -> ActionResponse {
    let voting_ends_at = action.voting_ends_at();
    let expired = action.is_expired(now);
    ActionResponse {
        id: action.id,
        owner: action.owner,
        name: action.name,
        description: action.description,
        url: action.url,
        destination: action.destination,
        payload: action.payload,
        creation_timestamp: action.creation_timestamp,
        action_type: action.action_type,
        voting_ends_at,
        acceptance_threshold: action.acceptance_threshold,
        executed: action.executed,
        expired,
        votes: action.votes,
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        pillar_registry: config.pillar_registry,
        proposal_fee: config.proposal_fee,
        type1: config.type1,
        type2: config.type2,
    })
}

pub fn query_action(deps: Deps, env: Env, id: Binary) -> StdResult<ActionResponse> {
    let id = parse_hash(&id)?;
    let action = ACTIONS.load(deps.storage, &id)?;
    Ok(action_response(action, env.block.time.seconds()))
}

/// Paginated list of actions, ordered by id.
pub fn query_actions(
    deps: Deps,
    env: Env,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<ActionsResponse> {
    let start = start_after
        .as_ref()
        .map(|id| Bound::exclusive(id.as_slice()));
    let now = env.block.time.seconds();

    let actions = ACTIONS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, action)| action_response(action, now)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ActionsResponse { actions })
}

pub fn query_action_votes(
    deps: Deps,
    id: Binary,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ActionVotesResponse> {
    let id = parse_hash(&id)?;
    let start = start_after.as_deref().map(Bound::exclusive);

    let votes = VOTES
        .prefix(id.as_slice())
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| {
            item.map(|(_, vote)| PillarVoteResponse {
                pillar: vote.pillar,
                voter: vote.voter,
                vote: vote.vote,
                weight: vote.weight,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ActionVotesResponse { votes })
}
