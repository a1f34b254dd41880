//! Thread-safe funding service.
//!
//! Wraps a [`CampaignLedger`] in a mutex together with a [`Clock`] and a
//! [`SettlementEngine`]. Each create / donate call runs entirely under the
//! lock. `end_campaign` commits its bookkeeping under the lock, releases it
//! for the external transfer, and re-acquires it to confirm or roll back:
//!
//! ```text
//!   lock ─ commit ─ unlock ─▶ transfer ─▶ lock ─ confirm | revert ─ unlock
//! ```
//!
//! A transfer that calls back into the service therefore never deadlocks,
//! and it observes the campaign as already paid out.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use fundraise_ledger::{CampaignLedger, ConservationReport, LedgerSnapshot, Settlement};
use fundraise_types::{AccountId, Campaign, CampaignId, Clock, LedgerEvent, Result};
use rust_decimal::Decimal;

use crate::{
    engine::{SettlementEngine, resolve},
    transfer::PayoutTransfer,
};

/// Shared entry point for concurrent callers.
pub struct FundingService<C, T> {
    ledger: Mutex<CampaignLedger>,
    clock: C,
    engine: SettlementEngine<T>,
}

impl<C: Clock, T: PayoutTransfer> FundingService<C, T> {
    pub fn new(ledger: CampaignLedger, clock: C, transfer: T) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            clock,
            engine: SettlementEngine::new(transfer),
        }
    }

    /// Ledger mutations validate before writing and never panic part-way.
    /// The transfer runs without the lock and its panics are caught by the
    /// engine, so a poisoned lock still guards consistent state.
    fn ledger(&self) -> MutexGuard<'_, CampaignLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a campaign for `caller`, ending `duration` from now.
    pub fn create_campaign(
        &self,
        caller: AccountId,
        title: impl Into<String>,
        description: impl Into<String>,
        goal: Decimal,
        duration: Duration,
    ) -> Result<CampaignId> {
        let mut ledger = self.ledger();
        let now = self.clock.now();
        ledger.create_campaign(caller, title, description, goal, duration, now)
    }

    /// Donate `amount` from `donor` to campaign `id`.
    pub fn donate_to_campaign(
        &self,
        donor: AccountId,
        id: CampaignId,
        amount: Decimal,
    ) -> Result<()> {
        let mut ledger = self.ledger();
        let now = self.clock.now();
        ledger.donate(donor, id, amount, now)
    }

    /// Settle campaign `id`, paying everything raised to its recipient.
    /// Anyone may call this.
    ///
    /// # Errors
    /// Same as [`SettlementEngine::end_campaign`].
    pub fn end_campaign(&self, id: CampaignId) -> Result<Settlement> {
        let pending = {
            let mut ledger = self.ledger();
            let now = self.clock.now();
            ledger.commit_payout(id, now)?
        };

        // Lock released: the transfer may re-enter this service.
        let outcome = self.engine.execute(&pending);

        let mut ledger = self.ledger();
        let now = self.clock.now();
        resolve(&mut ledger, pending, outcome, now)
    }

    #[must_use]
    pub fn total_campaigns(&self) -> u64 {
        self.ledger().total_campaigns()
    }

    /// Outstanding value across all unsettled campaigns.
    #[must_use]
    pub fn total_funding(&self) -> Decimal {
        self.ledger().total_funding()
    }

    #[must_use]
    pub fn user_campaigns(&self, creator: &AccountId) -> Vec<CampaignId> {
        self.ledger().user_campaigns(creator).to_vec()
    }

    #[must_use]
    pub fn campaign(&self, id: CampaignId) -> Option<Campaign> {
        self.ledger().campaign(id).cloned()
    }

    #[must_use]
    pub fn amount_raised(&self, id: CampaignId) -> Decimal {
        self.ledger().amount_raised(id)
    }

    /// Take all notifications emitted since the last drain.
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.ledger().drain_events()
    }

    pub fn verify_conservation(&self) -> Result<ConservationReport> {
        self.ledger().verify_conservation()
    }

    /// Capture the ledger for storage.
    ///
    /// # Errors
    /// `PayoutInFlight` while some `end_campaign` call is between its commit
    /// and its transfer outcome.
    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        let ledger = self.ledger();
        ledger.snapshot(self.clock.now())
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn transfer(&self) -> &T {
        self.engine.transfer()
    }
}
