//! Error types for the governance contract

use cosmwasm_std::{Coin, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Permission denied: caller is not the owner of pillar {pillar}")]
    PermissionDenied { pillar: String },

    #[error("Unauthorized: only the governance contract itself can perform this action")]
    Unauthorized,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Forbidden parameter: {reason}")]
    ForbiddenParam { reason: String },

    #[error("Invalid proposal fee: expected exactly {expected}")]
    InvalidProposalFee { expected: Coin },

    // ========================================================================
    // Lookup Errors
    // ========================================================================

    #[error("Action not found")]
    ActionNotFound,

    #[error("Pillar not found: {name}")]
    PillarNotFound { name: String },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================

    #[error("Action already exists (data integrity)")]
    ActionAlreadyExists,

    #[error("Action already executed")]
    ActionAlreadyExecuted,

    #[error("Action expired without reaching the acceptance threshold")]
    ActionExpired,

    #[error("Voting period not ended: ends at {ends_at}")]
    VotingPeriodNotEnded { ends_at: u64 },

    #[error("Voting closed at {closed_at}")]
    VotingClosed { closed_at: u64 },
}
