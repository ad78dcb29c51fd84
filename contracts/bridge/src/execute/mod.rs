//! Execute handlers for the bridge contract.
//!
//! - `security` - administrator, guardians, TSS key, halt and emergency
//! - `network` - networks and token pairs
//! - `wrap` - outgoing transfers and fee collection
//! - `unwrap` - incoming transfers, redemption and revocation

mod network;
mod security;
mod unwrap;
mod wrap;

pub use network::*;
pub use security::*;
pub use unwrap::*;
pub use wrap::*;
