//! Governance Contract - Pillar-Weighted Action Voting
//!
//! Anyone can propose an action: an arbitrary call (`destination`, `payload`)
//! to be dispatched by this contract once pillars have accepted it.
//!
//! # Lifecycle
//! 1. `ProposeAction` stores the action (fixed proposal fee attached)
//! 2. Pillar owners `VoteByName` during the voting period; the weight of each
//!    pillar comes from the pillar registry, and a later vote by the same
//!    pillar replaces its earlier one
//! 3. After the voting period, `ExecuteAction` dispatches the payload once if
//!    `yes * 100 >= total * threshold`; otherwise the action is expired
//!
//! Voting periods and thresholds come in two tiers (`Type1`, `Type2`) and can
//! only be changed by the contract itself, i.e. through an executed action.

pub mod contract;
pub mod error;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
