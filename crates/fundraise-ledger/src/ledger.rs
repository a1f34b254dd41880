//! The campaign ledger: registry + outstanding total + event outbox.
//!
//! `CampaignLedger` is single-threaded. Callers that share it
//! across threads wrap it in a lock (see `fundraise-settlement`'s
//! `FundingService`); every public mutation here is one `&mut self` call
//! and therefore one indivisible step.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use fundraise_types::{
    AccountId, CampaignId, LedgerConfig, LedgerEvent, LedgerEventKind, Result,
};
use rust_decimal::Decimal;

use crate::registry::{CampaignRegistry, NewCampaign};

/// Campaign registry, contribution totals, and pending notifications.
#[derive(Debug, Clone)]
pub struct CampaignLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) registry: CampaignRegistry,
    /// Σ `amount_raised` over campaigns not yet paid out. Only `donate`,
    /// `commit_payout` and `revert_payout` touch it.
    pub(crate) total_outstanding: Decimal,
    /// Payouts committed but not yet confirmed or reverted, with the amount
    /// each one removed from the outstanding total.
    pub(crate) in_flight: BTreeMap<CampaignId, Decimal>,
    /// Notifications not yet drained by the embedder.
    pub(crate) outbox: Vec<LedgerEvent>,
    /// Sequence number of the next event.
    pub(crate) next_sequence: u64,
}

impl CampaignLedger {
    /// Create an empty ledger with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(LedgerConfig::default(), CampaignRegistry::new(), Decimal::ZERO, 0)
    }

    /// Create an empty ledger with the given limits.
    ///
    /// # Errors
    /// Returns [`fundraise_types::FundraiseError::Configuration`] if the
    /// config is unusable.
    pub fn with_config(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, CampaignRegistry::new(), Decimal::ZERO, 0))
    }

    pub(crate) fn from_parts(
        config: LedgerConfig,
        registry: CampaignRegistry,
        total_outstanding: Decimal,
        next_sequence: u64,
    ) -> Self {
        Self {
            config,
            registry,
            total_outstanding,
            in_flight: BTreeMap::new(),
            outbox: Vec::new(),
            next_sequence,
        }
    }

    /// Register a new campaign on behalf of `creator`.
    ///
    /// The campaign's deadline is `now + duration` and its recipient is
    /// `creator`. Emits `CampaignCreated`.
    ///
    /// # Errors
    /// - `InvalidParameters(GoalZero | NegativeGoal)` for a bad goal
    /// - `InvalidParameters(DurationZero)` for a zero or negative duration
    /// - `InvalidParameters(..)` for configured limit violations
    pub fn create_campaign(
        &mut self,
        creator: AccountId,
        title: impl Into<String>,
        description: impl Into<String>,
        goal: Decimal,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<CampaignId> {
        let request = NewCampaign::new(title, description, goal, duration);
        let id = self.registry.register(creator, request, now, &self.config)?;

        tracing::info!(
            campaign = %id,
            creator = %creator,
            goal = %goal,
            "Campaign created"
        );
        self.emit(
            LedgerEventKind::CampaignCreated {
                campaign: id,
                creator,
            },
            now,
        );
        Ok(id)
    }

    pub(crate) fn emit(&mut self, kind: LedgerEventKind, now: DateTime<Utc>) {
        self.outbox.push(LedgerEvent {
            sequence: self.next_sequence,
            kind,
            recorded_at: now,
        });
        self.next_sequence += 1;
    }

    /// Take all notifications emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Notifications emitted but not yet drained.
    #[must_use]
    pub fn pending_events(&self) -> &[LedgerEvent] {
        &self.outbox
    }

    /// Campaigns whose payout transfer has not resolved yet.
    pub fn payouts_in_flight(&self) -> impl Iterator<Item = CampaignId> + '_ {
        self.in_flight.keys().copied()
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Read access to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &CampaignRegistry {
        &self.registry
    }
}

impl Default for CampaignLedger {
    fn default() -> Self {
        Self::new()
    }
}
