//! Foreign network address validation
//!
//! Contract, token and destination addresses on foreign networks are kept as
//! the strings users and orchestrators exchange, and must be 0x-prefixed
//! 20-byte hex addresses.

use cosmwasm_std::{StdError, StdResult};

use crate::error::ContractError;

const HEX_ADDRESS_LENGTH: usize = 40;

/// Parse a 0x-prefixed hex address to 20 bytes
pub fn parse_hex_address(addr: &str) -> StdResult<[u8; 20]> {
    let hex_str = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .ok_or_else(|| StdError::generic_err("Address must start with 0x"))?;

    if hex_str.len() != HEX_ADDRESS_LENGTH {
        return Err(StdError::generic_err(format!(
            "Invalid address length: expected {} hex chars, got {}",
            HEX_ADDRESS_LENGTH,
            hex_str.len()
        )));
    }

    let bytes =
        hex::decode(hex_str).map_err(|e| StdError::generic_err(format!("Invalid hex: {}", e)))?;

    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes);
    Ok(result)
}

pub fn validate_foreign_address(field: &str, addr: &str) -> Result<(), ContractError> {
    parse_hex_address(addr)
        .map(|_| ())
        .map_err(|e| ContractError::ForbiddenParam {
            reason: format!("{}: {}", field, e),
        })
}
