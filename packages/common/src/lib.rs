//! Common - Shared Types and Utilities for the Embedded Contracts
//!
//! This package provides the pieces reused by more than one contract:
//! asset handling, content hashing, the time challenge ledger and the
//! pillar registry query interface consumed by governance.

pub mod asset;
pub mod hash;
pub mod pillar;
pub mod time_challenge;

pub use asset::AssetInfo;
pub use hash::{bytes32_to_hex, keccak256, keccak256_fields, parse_hash};
pub use pillar::{PillarInfo, PillarQueryMsg, PillarResponse};
pub use time_challenge::{
    ChallengeStatus, TimeChallenge, TimeChallengeLedger, TIME_CHALLENGE_STARTED,
};
