use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub administrator: String,
    pub governance: Option<String>,
    /// Heights between activation and enforcement (must be > 0)
    pub activation_delay: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a new, inactive spork.
    ///
    /// Authorization: administrator or governance
    CreateSpork { name: String, description: String },

    /// Activate a spork; it becomes enforced `activation_delay` heights later.
    ///
    /// Authorization: administrator or governance
    ActivateSpork { id: Binary },

    /// Authorization: administrator only
    UpdateGovernance { governance: Option<String> },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(SporkResponse)]
    Spork { id: Binary },

    #[returns(SporksResponse)]
    Sporks {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    /// Whether the spork is activated and its enforcement height is reached
    #[returns(IsEnforcedResponse)]
    IsEnforced { id: Binary },
}

#[cw_serde]
pub struct ConfigResponse {
    pub administrator: Addr,
    pub governance: Option<Addr>,
    pub activation_delay: u64,
}

#[cw_serde]
pub struct SporkResponse {
    pub id: Binary,
    pub name: String,
    pub description: String,
    pub activated: bool,
    pub enforcement_height: u64,
}

#[cw_serde]
pub struct SporksResponse {
    pub sporks: Vec<SporkResponse>,
}

#[cw_serde]
pub struct IsEnforcedResponse {
    pub enforced: bool,
}
