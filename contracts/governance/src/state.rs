//! State definitions for the governance contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Coin};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Voting tier of an action
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ActionType {
    Type1,
    Type2,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Type1 => "type1",
            ActionType::Type2 => "type2",
        }
    }
}

#[cw_serde]
pub struct ActionTypeParams {
    /// Voting period in seconds
    pub voting_period: u64,
    /// Minimum yes share of the cast weight, in percent (1-100)
    pub acceptance_threshold: u8,
}

#[cw_serde]
pub struct Config {
    /// Contract answering `PillarQueryMsg`
    pub pillar_registry: Addr,
    /// Fee attached to every proposal
    pub proposal_fee: Coin,
    pub type1: ActionTypeParams,
    pub type2: ActionTypeParams,
}

impl Config {
    pub fn params(&self, action_type: ActionType) -> &ActionTypeParams {
        match action_type {
            ActionType::Type1 => &self.type1,
            ActionType::Type2 => &self.type2,
        }
    }
}

// ============================================================================
// Actions & Votes
// ============================================================================

#[cw_serde]
#[derive(Copy, Eq)]
pub enum VoteOption {
    Yes,
    No,
}

impl VoteOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOption::Yes => "yes",
            VoteOption::No => "no",
        }
    }
}

#[cw_serde]
#[derive(Default)]
pub struct VoteTally {
    pub total: u64,
    pub yes: u64,
    pub no: u64,
}

impl VoteTally {
    pub fn add(&mut self, vote: VoteOption, weight: u64) {
        self.total = self.total.saturating_add(weight);
        match vote {
            VoteOption::Yes => self.yes = self.yes.saturating_add(weight),
            VoteOption::No => self.no = self.no.saturating_add(weight),
        }
    }

    pub fn remove(&mut self, vote: VoteOption, weight: u64) {
        self.total = self.total.saturating_sub(weight);
        match vote {
            VoteOption::Yes => self.yes = self.yes.saturating_sub(weight),
            VoteOption::No => self.no = self.no.saturating_sub(weight),
        }
    }

    /// `yes * 100 >= total * threshold`, exact equality passes. An action
    /// nobody voted on is never accepted.
    pub fn is_accepted(&self, acceptance_threshold: u8) -> bool {
        if self.total == 0 {
            return false;
        }
        u128::from(self.yes) * 100 >= u128::from(self.total) * u128::from(acceptance_threshold)
    }
}

#[cw_serde]
pub struct Action {
    /// keccak256 of owner, name, description, url, destination, payload and
    /// creation timestamp
    pub id: Binary,
    pub owner: Addr,
    pub name: String,
    pub description: String,
    pub url: String,
    pub destination: Addr,
    pub payload: Binary,
    /// Block time (seconds) of the proposal
    pub creation_timestamp: u64,
    pub action_type: ActionType,
    /// Tier parameters in force when the action was proposed
    pub voting_period: u64,
    pub acceptance_threshold: u8,
    pub executed: bool,
    pub votes: VoteTally,
}

impl Action {
    pub fn voting_ends_at(&self) -> u64 {
        self.creation_timestamp.saturating_add(self.voting_period)
    }

    pub fn is_accepted(&self) -> bool {
        self.votes.is_accepted(self.acceptance_threshold)
    }

    /// Voting is over and the threshold was not reached.
    pub fn is_expired(&self, now: u64) -> bool {
        !self.executed && now >= self.voting_ends_at() && !self.is_accepted()
    }
}

/// The current vote of one pillar on one action
#[cw_serde]
pub struct PillarVote {
    pub pillar: String,
    pub voter: Addr,
    pub vote: VoteOption,
    /// Weight reported by the pillar registry when the vote was cast
    pub weight: u64,
}

// ============================================================================
// Constants
// ============================================================================

pub const CONTRACT_NAME: &str = "crates.io:governance";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ACTION_NAME_MAX_LENGTH: usize = 30;
pub const ACTION_DESCRIPTION_MAX_LENGTH: usize = 240;
pub const ACTION_URL_MAX_LENGTH: usize = 255;

// ============================================================================
// Storage
// ============================================================================

pub const CONFIG: Item<Config> = Item::new("config");

/// Key: 32-byte action id
pub const ACTIONS: Map<&[u8], Action> = Map::new("actions");

/// Key: (action id, pillar name)
pub const VOTES: Map<(&[u8], &str), PillarVote> = Map::new("votes");
