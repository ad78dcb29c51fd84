//! Spork Registry Contract
//!
//! Sporks are named feature flags. They are created inactive and, once
//! activated, become enforced after a fixed delay in block heights. Activation
//! is restricted to the spork administrator or the governance contract, so a
//! feature can be gated behind a governance vote by proposing an action whose
//! payload is `ActivateSpork`.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
