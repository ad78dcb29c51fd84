//! State definitions for the spork contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// Identity allowed to create and activate sporks
    pub administrator: Addr,
    /// Governance contract, also allowed to create and activate sporks
    pub governance: Option<Addr>,
    /// Heights between activation and enforcement
    pub activation_delay: u64,
}

#[cw_serde]
pub struct Spork {
    /// keccak256(name, description, creator, creator nonce)
    pub id: Binary,
    pub name: String,
    pub description: String,
    pub activated: bool,
    /// Zero until activated
    pub enforcement_height: u64,
}

impl Spork {
    pub fn is_enforced(&self, height: u64) -> bool {
        self.activated && height >= self.enforcement_height
    }
}

pub const CONTRACT_NAME: &str = "crates.io:spork";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SPORK_NAME_MIN_LENGTH: usize = 5;
pub const SPORK_NAME_MAX_LENGTH: usize = 40;
pub const SPORK_DESCRIPTION_MAX_LENGTH: usize = 400;

pub const CONFIG: Item<Config> = Item::new("config");

/// Key: 32-byte spork id
pub const SPORKS: Map<&[u8], Spork> = Map::new("sporks");

/// Spork names already taken. Key: name, Value: spork id
pub const SPORK_NAMES: Map<&str, Binary> = Map::new("spork_names");

/// Number of sporks each creator has created, mixed into new spork ids
pub const CREATOR_NONCES: Map<&Addr, u64> = Map::new("creator_nonces");
