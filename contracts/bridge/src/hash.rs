//! Canonical message encoding and digests for TSS-signed messages
//!
//! Messages are a packed encoding of their fields:
//! - integers: 32-byte big-endian words
//! - strings and bytes: a 32-byte length word followed by the raw bytes
//!
//! The digest that gets signed depends on the network class the message
//! targets. EVM networks sign the `personal_sign` form, everything else
//! (including the bridge's own halt and key change messages) signs sha256.

use cosmwasm_std::Uint128;
use sha2::{Digest, Sha256};

use common::keccak256;

use crate::state::{CHANGE_TSS_METHOD, HALT_METHOD};

/// Network class of EVM-compatible chains
pub const EVM_NETWORK_CLASS: u32 = 2;

const ETHEREUM_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `keccak256("\x19Ethereum Signed Message:\n32" ++ keccak256(message))`
pub fn ethereum_signed_digest(message: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(ETHEREUM_SIGNED_MESSAGE_PREFIX.len() + 32);
    data.extend_from_slice(ETHEREUM_SIGNED_MESSAGE_PREFIX);
    data.extend_from_slice(&keccak256(message));
    keccak256(&data)
}

pub fn digest_for_network_class(message: &[u8], network_class: u32) -> [u8; 32] {
    if network_class == EVM_NETWORK_CLASS {
        ethereum_signed_digest(message)
    } else {
        sha256(message)
    }
}

// ============================================================================
// Packed Encoding
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct PackedEncoder {
    buf: Vec<u8>,
}

impl PackedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uint(mut self, value: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        self.buf.extend_from_slice(&word);
        self
    }

    pub fn u64(self, value: u64) -> Self {
        self.uint(u128::from(value))
    }

    pub fn u32(self, value: u32) -> Self {
        self.uint(u128::from(value))
    }

    pub fn amount(self, value: Uint128) -> Self {
        self.uint(value.u128())
    }

    pub fn bytes(self, value: &[u8]) -> Self {
        let mut encoder = self.uint(value.len() as u128);
        encoder.buf.extend_from_slice(value);
        encoder
    }

    pub fn string(self, value: &str) -> Self {
        self.bytes(value.as_bytes())
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// Signed Messages
// ============================================================================

/// `(method_name, tss_nonce, chain_identifier)`
pub fn halt_message(tss_nonce: u64, chain_identifier: &str) -> Vec<u8> {
    PackedEncoder::new()
        .string(HALT_METHOD)
        .u64(tss_nonce)
        .string(chain_identifier)
        .finish()
}

/// `(method_name, tss_nonce, chain_identifier, new_key)`
pub fn change_tss_message(tss_nonce: u64, chain_identifier: &str, new_key: &[u8]) -> Vec<u8> {
    PackedEncoder::new()
        .string(CHANGE_TSS_METHOD)
        .u64(tss_nonce)
        .string(chain_identifier)
        .bytes(new_key)
        .finish()
}

#[allow(clippy::too_many_arguments)]
pub fn unwrap_message(
    network_class: u32,
    chain_id: u32,
    transaction_hash: &[u8],
    log_index: u32,
    to_address: &str,
    token_address: &str,
    amount: Uint128,
) -> Vec<u8> {
    PackedEncoder::new()
        .u32(network_class)
        .u32(chain_id)
        .bytes(transaction_hash)
        .u32(log_index)
        .string(to_address)
        .string(token_address)
        .amount(amount)
        .finish()
}

#[allow(clippy::too_many_arguments)]
pub fn wrap_message(
    network_class: u32,
    chain_id: u32,
    request_id: &[u8],
    to_address: &str,
    token_address: &str,
    amount: Uint128,
    fee: Uint128,
    contract_address: &str,
) -> Vec<u8> {
    PackedEncoder::new()
        .u32(network_class)
        .u32(chain_id)
        .bytes(request_id)
        .string(to_address)
        .string(token_address)
        .amount(amount)
        .amount(fee)
        .string(contract_address)
        .finish()
}
