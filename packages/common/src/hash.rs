//! Content hashing shared by every contract.
//!
//! Sporks, actions, wrap requests and time challenge parameters are all
//! identified by keccak256 digests of their content rather than by counters,
//! so replaying the same calls against the same state yields the same keys.

use cosmwasm_std::{Binary, StdError, StdResult};
use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Hash a sequence of fields, each prefixed with its length so that
/// `("ab", "c")` and `("a", "bc")` never collide.
pub fn keccak256_fields(fields: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    for field in fields {
        hasher.update(&(field.len() as u64).to_be_bytes());
        hasher.update(field);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 32-byte hash from Binary input.
pub fn parse_hash(hash: &Binary) -> StdResult<[u8; 32]> {
    hash.to_vec().try_into().map_err(|_| {
        StdError::generic_err(format!(
            "Invalid hash length: expected 32 bytes, got {}",
            hash.len()
        ))
    })
}
