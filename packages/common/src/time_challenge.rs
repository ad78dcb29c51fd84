//! Time Challenge Ledger
//!
//! Delay-then-confirm guard for sensitive configuration changes. The first
//! call for a method records a challenge for its parameter hash; the change is
//! only applied when the same call is issued again once the delay (in block
//! heights) has elapsed. Calling with different parameters overwrites the
//! pending challenge and restarts its clock.
//!
//! There is at most one live challenge per method name.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Order, StdResult, Storage};
use cw_storage_plus::Map;

/// Parameter hash stored once a challenge has been consumed.
pub const CLEARED_PARAMS_HASH: [u8; 32] = [0u8; 32];

/// Value of the `time_challenge` attribute when a challenge is (re)started.
pub const TIME_CHALLENGE_STARTED: &str = "started";

#[cw_serde]
pub struct TimeChallenge {
    pub method_name: String,
    /// 32-byte hash of the challenged parameters (all zero once consumed)
    pub params_hash: Binary,
    /// Height at which the current parameters were first submitted
    pub challenge_start_height: u64,
}

impl TimeChallenge {
    pub fn is_cleared(&self) -> bool {
        self.params_hash.as_slice() == CLEARED_PARAMS_HASH
    }
}

/// Outcome of [`TimeChallengeLedger::start_or_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// New or changed parameters were recorded; nothing may be applied yet.
    Started { due_at: u64 },
    /// Same parameters, but the delay has not elapsed.
    NotDue { due_at: u64 },
    /// Delay elapsed for the same parameters. The challenge has been cleared
    /// and the caller applies the change.
    Due,
}

pub struct TimeChallengeLedger<'a> {
    challenges: Map<'a, &'a str, TimeChallenge>,
}

impl<'a> TimeChallengeLedger<'a> {
    pub const fn new(namespace: &'a str) -> Self {
        Self {
            challenges: Map::new(namespace),
        }
    }

    pub fn start_or_check(
        &self,
        storage: &mut dyn Storage,
        method_name: &'a str,
        params_hash: [u8; 32],
        current_height: u64,
        required_delay: u64,
    ) -> StdResult<ChallengeStatus> {
        let existing = self.challenges.may_load(storage, method_name)?;

        match existing {
            Some(challenge) if challenge.params_hash.as_slice() == params_hash => {
                let due_at = challenge
                    .challenge_start_height
                    .saturating_add(required_delay);
                if current_height < due_at {
                    return Ok(ChallengeStatus::NotDue { due_at });
                }

                self.challenges.save(
                    storage,
                    method_name,
                    &TimeChallenge {
                        method_name: method_name.to_string(),
                        params_hash: Binary::from(CLEARED_PARAMS_HASH.to_vec()),
                        challenge_start_height: challenge.challenge_start_height,
                    },
                )?;
                Ok(ChallengeStatus::Due)
            }
            _ => {
                self.challenges.save(
                    storage,
                    method_name,
                    &TimeChallenge {
                        method_name: method_name.to_string(),
                        params_hash: Binary::from(params_hash.to_vec()),
                        challenge_start_height: current_height,
                    },
                )?;
                Ok(ChallengeStatus::Started {
                    due_at: current_height.saturating_add(required_delay),
                })
            }
        }
    }

    pub fn load(
        &self,
        storage: &dyn Storage,
        method_name: &'a str,
    ) -> StdResult<Option<TimeChallenge>> {
        self.challenges.may_load(storage, method_name)
    }

    /// All challenges that are still pending (cleared entries are skipped).
    pub fn pending(&self, storage: &dyn Storage) -> StdResult<Vec<TimeChallenge>> {
        self.challenges
            .range(storage, None, None, Order::Ascending)
            .filter_map(|item| match item {
                Ok((_, challenge)) if challenge.is_cleared() => None,
                Ok((_, challenge)) => Some(Ok(challenge)),
                Err(e) => Some(Err(e)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    const LEDGER: TimeChallengeLedger = TimeChallengeLedger::new("tc");

    #[test]
    fn test_first_call_starts_challenge() {
        let mut deps = mock_dependencies();
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 100, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::Started { due_at: 110 });

        let stored = LEDGER.load(deps.as_ref().storage, "SetTokenPair").unwrap().unwrap();
        assert_eq!(stored.challenge_start_height, 100);
        assert_eq!(stored.params_hash.as_slice(), &[1u8; 32]);
    }

    #[test]
    fn test_same_params_before_delay_not_due() {
        let mut deps = mock_dependencies();
        LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 100, 10)
            .unwrap();
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 109, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::NotDue { due_at: 110 });
    }

    #[test]
    fn test_same_params_after_delay_is_due_and_clears() {
        let mut deps = mock_dependencies();
        LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 100, 10)
            .unwrap();
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 110, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::Due);

        let stored = LEDGER.load(deps.as_ref().storage, "SetTokenPair").unwrap().unwrap();
        assert!(stored.is_cleared());
        assert!(LEDGER.pending(deps.as_ref().storage).unwrap().is_empty());

        // Issuing the same call again starts a fresh challenge
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 111, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::Started { due_at: 121 });
    }

    #[test]
    fn test_changed_params_restart_clock() {
        let mut deps = mock_dependencies();
        LEDGER
            .start_or_check(deps.as_mut().storage, "NominateGuardians", [1u8; 32], 100, 10)
            .unwrap();
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "NominateGuardians", [2u8; 32], 150, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::Started { due_at: 160 });

        // The replacement parameters wait a full delay from the restart
        let status = LEDGER
            .start_or_check(deps.as_mut().storage, "NominateGuardians", [2u8; 32], 155, 10)
            .unwrap();
        assert_eq!(status, ChallengeStatus::NotDue { due_at: 160 });
    }

    #[test]
    fn test_methods_are_independent() {
        let mut deps = mock_dependencies();
        LEDGER
            .start_or_check(deps.as_mut().storage, "ChangeAdministrator", [1u8; 32], 1, 5)
            .unwrap();
        LEDGER
            .start_or_check(deps.as_mut().storage, "SetTokenPair", [1u8; 32], 2, 5)
            .unwrap();
        let pending = LEDGER.pending(deps.as_ref().storage).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].method_name, "ChangeAdministrator");
        assert_eq!(pending[1].method_name, "SetTokenPair");
    }
}
