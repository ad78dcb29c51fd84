use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only the spork administrator or governance can perform this action")]
    Unauthorized,

    #[error("Forbidden parameter: {reason}")]
    ForbiddenParam { reason: String },

    #[error("Spork already exists: {name}")]
    SporkAlreadyExists { name: String },

    #[error("Spork not found")]
    SporkNotFound,

    #[error("Spork already activated")]
    SporkAlreadyActivated,
}
