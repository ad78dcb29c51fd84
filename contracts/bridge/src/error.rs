//! Error types for the bridge contract

use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Permission denied: caller is not the administrator")]
    PermissionDenied,

    #[error("Caller is not a guardian")]
    NotGuardian,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Forbidden parameter: {reason}")]
    ForbiddenParam { reason: String },

    #[error("Invalid JSON metadata")]
    InvalidJson,

    #[error("Invalid public key")]
    InvalidPublicKey,

    // ========================================================================
    // Lookup Errors
    // ========================================================================

    #[error("Unknown network: class {network_class}, chain {chain_id}")]
    UnknownNetwork { network_class: u32, chain_id: u32 },

    #[error("Token pair not found")]
    TokenNotFound,

    #[error("Data does not exist")]
    DataNonExistent,

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("Bridge not initialized")]
    BridgeNotInitialized,

    #[error("Bridge is halted")]
    BridgeHalted,

    #[error("Bridge is not halted")]
    BridgeNotHalted,

    #[error("Security not initialized: no guardians nominated")]
    SecurityNotInitialized,

    #[error("Bridge is not in emergency mode")]
    NotEmergency,

    #[error("Key generation is not allowed")]
    NotAllowedToChangeTss,

    // ========================================================================
    // Timing Errors
    // ========================================================================

    #[error("Time challenge not due: due at height {due_at}")]
    TimeChallengeNotDue { due_at: u64 },

    #[error("Redeem period not reached: redeemable at height {redeemable_at}")]
    InvalidRedeemPeriod { redeemable_at: u64 },

    // ========================================================================
    // Integrity Errors
    // ========================================================================

    #[error("Invalid ECDSA signature")]
    InvalidECDSASignature,

    #[error("Unwrap request already redeemed or revoked")]
    InvalidRedeemRequest,

    #[error("Invalid token or amount")]
    InvalidTokenOrAmount,

    #[error("Amount is below the token pair minimum")]
    InvalidMinAmount,

    #[error("Token is not bridgeable")]
    TokenNotBridgeable,

    #[error("Token is not redeemable")]
    TokenNotRedeemable,

    #[error("Unwrap request already registered for this transaction hash and log index")]
    UnwrapRequestAlreadyRegistered,

    #[error("Wrap request already exists")]
    WrapRequestAlreadyExists,
}
