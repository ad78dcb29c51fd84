//! Message types for the governance contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin};

use crate::state::{ActionType, ActionTypeParams, VoteOption, VoteTally};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    /// Pillar registry contract consulted for voting weights
    pub pillar_registry: String,
    pub proposal_fee: Coin,
    pub type1: ActionTypeParams,
    pub type2: ActionTypeParams,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Propose a call to `destination` with `payload` as its execute message.
    ///
    /// Authorization: Anyone (proposal fee attached)
    ProposeAction {
        name: String,
        description: String,
        url: String,
        destination: String,
        payload: Binary,
        /// Defaults to `Type1`
        action_type: Option<ActionType>,
    },

    /// Vote on an action on behalf of a pillar.
    ///
    /// Authorization: owner of the named pillar
    VoteByName {
        action_id: Binary,
        pillar_name: String,
        vote: VoteOption,
    },

    /// Dispatch an accepted action once its voting period is over.
    ///
    /// Authorization: Anyone
    ExecuteAction { action_id: Binary },

    /// Change the voting period and threshold of a tier.
    ///
    /// Authorization: this contract only (through an executed action)
    UpdateActionTypeParams {
        action_type: ActionType,
        params: ActionTypeParams,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(ActionResponse)]
    Action { id: Binary },

    #[returns(ActionsResponse)]
    Actions {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Current vote of every pillar that voted on the action
    #[returns(ActionVotesResponse)]
    ActionVotes {
        id: Binary,
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub pillar_registry: Addr,
    pub proposal_fee: Coin,
    pub type1: ActionTypeParams,
    pub type2: ActionTypeParams,
}

#[cw_serde]
pub struct ActionResponse {
    pub id: Binary,
    pub owner: Addr,
    pub name: String,
    pub description: String,
    pub url: String,
    pub destination: Addr,
    pub payload: Binary,
    pub creation_timestamp: u64,
    pub action_type: ActionType,
    pub voting_ends_at: u64,
    pub acceptance_threshold: u8,
    pub executed: bool,
    /// Voting is over and the threshold was not reached
    pub expired: bool,
    pub votes: VoteTally,
}

#[cw_serde]
pub struct ActionsResponse {
    pub actions: Vec<ActionResponse>,
}

#[cw_serde]
pub struct PillarVoteResponse {
    pub pillar: String,
    pub voter: Addr,
    pub vote: VoteOption,
    pub weight: u64,
}

#[cw_serde]
pub struct ActionVotesResponse {
    pub votes: Vec<PillarVoteResponse>,
}
