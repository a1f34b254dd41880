//! Payout bookkeeping: the ledger half of settlement.
//!
//! Settlement is split into three steps so that the external transfer can
//! run after the ledger has already recorded the campaign as paid out:
//!
//! ```text
//!   commit_payout ──▶ (external transfer) ──┬─ ok ───▶ confirm_payout
//!                                           └─ err ──▶ revert_payout
//! ```
//!
//! `commit_payout` marks the campaign paid out, zeroes its raised amount and
//! removes it from the outstanding total. Anything that re-enters the
//! ledger while the transfer is in flight sees a settled campaign.
//! `revert_payout` restores exactly what was committed.
//!
//! Until one of those two calls arrives the payout is tracked as in flight,
//! and [`CampaignLedger::snapshot`] refuses to capture the ledger.

use chrono::{DateTime, Utc};
use fundraise_types::{AccountId, CampaignId, FundraiseError, LedgerEventKind, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    amount::{exact_add, exact_sub},
    ledger::CampaignLedger,
};

/// A payout committed to the ledger but not yet confirmed or reverted.
///
/// Only [`CampaignLedger::commit_payout`] creates one; it must be handed to
/// `confirm_payout` or `revert_payout` on the same ledger.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a committed payout must be confirmed or reverted"]
pub struct PendingPayout {
    campaign: CampaignId,
    recipient: AccountId,
    amount: Decimal,
}

impl PendingPayout {
    #[must_use]
    pub fn campaign(&self) -> CampaignId {
        self.campaign
    }

    #[must_use]
    pub fn recipient(&self) -> AccountId {
        self.recipient
    }

    /// The full amount raised when settlement began.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub campaign: CampaignId,
    pub recipient: AccountId,
    pub amount: Decimal,
    pub settled_at: DateTime<Utc>,
}

impl CampaignLedger {
    /// Check settlement preconditions and commit the bookkeeping.
    ///
    /// Checks run in order:
    /// 1. the campaign exists
    /// 2. `now >= deadline`
    /// 3. the campaign is not already paid out
    /// 4. something was raised
    ///
    /// # Errors
    /// - `InvalidCampaign(id)`
    /// - `CampaignNotEnded { deadline }`
    /// - `CampaignInactive` if already paid out
    /// - `NoFundsRaised`
    /// - `ConservationViolation` if the outstanding total cannot cover the
    ///   campaign (ledger corruption)
    pub fn commit_payout(&mut self, id: CampaignId, now: DateTime<Utc>) -> Result<PendingPayout> {
        let campaign = self.registry.lookup_mut(id)?;
        if !campaign.is_matured_at(now) {
            return Err(FundraiseError::CampaignNotEnded {
                deadline: campaign.deadline,
            });
        }
        if campaign.is_paid_out {
            return Err(FundraiseError::CampaignInactive);
        }
        if campaign.amount_raised.is_zero() {
            return Err(FundraiseError::NoFundsRaised);
        }

        let amount = campaign.amount_raised;
        let outstanding = exact_sub(self.total_outstanding, amount)
            .ok()
            .filter(|remaining| !remaining.is_sign_negative())
            .ok_or_else(|| FundraiseError::ConservationViolation {
                reason: format!(
                    "{id} raised {amount} but only {} is outstanding",
                    self.total_outstanding
                ),
            })?;

        campaign.is_paid_out = true;
        campaign.amount_raised = Decimal::ZERO;
        self.total_outstanding = outstanding;
        self.in_flight.insert(id, amount);

        tracing::debug!(
            campaign = %id,
            recipient = %campaign.recipient,
            amount = %amount,
            "Payout committed"
        );
        Ok(PendingPayout {
            campaign: id,
            recipient: campaign.recipient,
            amount,
        })
    }

    /// Finalize a committed payout after the transfer succeeded.
    /// Emits `CampaignEnded`.
    pub fn confirm_payout(&mut self, pending: PendingPayout, now: DateTime<Utc>) -> Settlement {
        let PendingPayout {
            campaign,
            recipient,
            amount,
        } = pending;
        self.in_flight.remove(&campaign);

        tracing::info!(
            campaign = %campaign,
            recipient = %recipient,
            amount = %amount,
            "Campaign settled"
        );
        self.emit(
            LedgerEventKind::CampaignEnded {
                recipient,
                campaign,
                amount,
            },
            now,
        );
        Settlement {
            campaign,
            recipient,
            amount,
            settled_at: now,
        }
    }

    /// Undo a committed payout after the transfer failed.
    ///
    /// # Errors
    /// Returns `Internal` if the campaign is no longer in the committed
    /// state, and `AmountOverflow` / `InexactAmount` if the total cannot be
    /// restored. None of these happen unless the payout belongs to a
    /// different ledger.
    pub fn revert_payout(&mut self, pending: PendingPayout) -> Result<()> {
        let campaign = self.registry.lookup_mut(pending.campaign)?;
        let committed = self.in_flight.get(&pending.campaign) == Some(&pending.amount);
        if !committed || !campaign.is_paid_out || !campaign.amount_raised.is_zero() {
            return Err(FundraiseError::Internal(format!(
                "{} is not in a committed payout state",
                pending.campaign
            )));
        }
        let outstanding = exact_add(self.total_outstanding, pending.amount)?;

        campaign.is_paid_out = false;
        campaign.amount_raised = pending.amount;
        self.total_outstanding = outstanding;
        self.in_flight.remove(&pending.campaign);

        tracing::warn!(
            campaign = %pending.campaign,
            amount = %pending.amount,
            "Payout reverted"
        );
        Ok(())
    }
}
