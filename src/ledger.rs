//! The ghosts currency ledger collaborator.
//!
//! Persistence is external: the engines only need atomic per-participant
//! credit/debit/read, which this trait promises. Award amounts are
//! computed once per game outcome by the driver, which then issues
//! exactly one `credit` - or none at all when the winner is exempt
//! ("unlimited" accounts never touch the ledger).

use rustc_hash::FxHashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::core::{GameError, ParticipantId};

/// Atomic per-participant currency operations.
pub trait Ledger: Send + Sync {
    /// Add `amount` ghosts to a balance.
    fn credit(&self, participant: ParticipantId, amount: i64);

    /// Remove `amount` ghosts; fails without mutating if the balance
    /// would go negative.
    fn debit(&self, participant: ParticipantId, amount: i64) -> Result<(), GameError>;

    /// Current balance (zero for unknown participants).
    fn balance(&self, participant: ParticipantId) -> i64;
}

/// Which participants bypass the ledger entirely.
pub trait ExemptionPolicy: Send + Sync {
    /// Exempt participants win games without a credit being issued.
    fn is_exempt(&self, participant: ParticipantId) -> bool;
}

/// The default policy: nobody is exempt.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExemptions;

impl ExemptionPolicy for NoExemptions {
    fn is_exempt(&self, _participant: ParticipantId) -> bool {
        false
    }
}

/// Credit a game award unless the winner is exempt.
///
/// Called exactly once per outcome by the drivers; front ends handling
/// the wheel themselves should go through this too.
pub fn award(
    ledger: &dyn Ledger,
    exemptions: &dyn ExemptionPolicy,
    winner: ParticipantId,
    amount: i64,
) {
    if exemptions.is_exempt(winner) {
        debug!(%winner, amount, "winner exempt, skipping credit");
        return;
    }
    ledger.credit(winner, amount);
    debug!(%winner, amount, "award credited");
}

/// Mutex-guarded in-memory ledger for tests and ephemeral front ends.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: Mutex<FxHashMap<ParticipantId, i64>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for InMemoryLedger {
    fn credit(&self, participant: ParticipantId, amount: i64) {
        let mut balances = self.balances.lock().expect("ledger lock poisoned");
        *balances.entry(participant).or_insert(0) += amount;
    }

    fn debit(&self, participant: ParticipantId, amount: i64) -> Result<(), GameError> {
        let mut balances = self.balances.lock().expect("ledger lock poisoned");
        let balance = balances.entry(participant).or_insert(0);
        if *balance < amount {
            return Err(GameError::InsufficientBalance);
        }
        *balance -= amount;
        Ok(())
    }

    fn balance(&self, participant: ParticipantId) -> i64 {
        self.balances
            .lock()
            .expect("ledger lock poisoned")
            .get(&participant)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_balance() {
        let ledger = InMemoryLedger::new();
        let p = ParticipantId::new(1);

        assert_eq!(ledger.balance(p), 0);
        ledger.credit(p, 10);
        ledger.credit(p, 5);
        assert_eq!(ledger.balance(p), 15);
    }

    #[test]
    fn test_debit_rejects_overdraft() {
        let ledger = InMemoryLedger::new();
        let p = ParticipantId::new(1);
        ledger.credit(p, 4);

        assert_eq!(ledger.debit(p, 5), Err(GameError::InsufficientBalance));
        assert_eq!(ledger.balance(p), 4);
        ledger.debit(p, 4).unwrap();
        assert_eq!(ledger.balance(p), 0);
    }

    #[test]
    fn test_award_skips_exempt_winners() {
        struct HostExempt;
        impl ExemptionPolicy for HostExempt {
            fn is_exempt(&self, participant: ParticipantId) -> bool {
                participant == ParticipantId::new(1)
            }
        }

        let ledger = InMemoryLedger::new();
        award(&ledger, &HostExempt, ParticipantId::new(1), 8);
        assert_eq!(ledger.balance(ParticipantId::new(1)), 0);

        award(&ledger, &HostExempt, ParticipantId::new(2), 8);
        assert_eq!(ledger.balance(ParticipantId::new(2)), 8);
    }
}
