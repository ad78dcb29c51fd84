//! Embedded Bridge Contract - Cross-Chain Wrap/Unwrap with TSS Custody
//!
//! Assets leave this chain through `WrapToken` (locked in custody, or burned
//! for owned tokens) and come back through `UnwrapToken` / `RedeemUnwrap`,
//! authorized by signatures of a threshold-signature (TSS) key.
//!
//! # Security
//! - An administrator configures networks and token pairs; sensitive changes
//!   go through a time challenge (submit, wait, confirm)
//! - The bridge can be halted by the administrator or by a TSS signature
//! - In an emergency the administrator is removed and guardians elect a new
//!   one by unanimous vote
//! - Unwrap requests are keyed by `(transaction_hash, log_index)` so a
//!   foreign event is credited at most once

pub mod address_codec;
pub mod contract;
pub mod error;
mod execute;
mod guards;
pub mod hash;
pub mod msg;
mod query;
pub mod signature;
pub mod state;

pub use crate::error::ContractError;
pub use crate::hash::{digest_for_network_class, PackedEncoder};
