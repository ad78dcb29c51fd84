//! Pillar registry query interface.
//!
//! Governance does not compute voting power itself. It asks a pillar registry
//! contract for the pillar registered under a name, which carries the account
//! allowed to vote for it and its current weight.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, QuerierWrapper, StdResult};

#[cw_serde]
#[derive(QueryResponses)]
pub enum PillarQueryMsg {
    #[returns(PillarResponse)]
    PillarByName { name: String },
}

#[cw_serde]
pub struct PillarInfo {
    pub name: String,
    /// Account entitled to vote on behalf of the pillar
    pub owner: Addr,
    pub weight: u64,
}

#[cw_serde]
pub struct PillarResponse {
    /// `None` when no active pillar is registered under the name
    pub pillar: Option<PillarInfo>,
}

pub fn query_pillar(
    querier: &QuerierWrapper,
    registry: &Addr,
    name: &str,
) -> StdResult<Option<PillarInfo>> {
    let response: PillarResponse = querier.query_wasm_smart(
        registry,
        &PillarQueryMsg::PillarByName {
            name: name.to_string(),
        },
    )?;
    Ok(response.pillar)
}
