//! Contribution ledger: accepting donations.
//!
//! A donation moves value into exactly one campaign and into the global
//! outstanding total, in the same call.

use chrono::{DateTime, Utc};
use fundraise_types::{AccountId, CampaignId, FundraiseError, LedgerEventKind, Result};
use rust_decimal::Decimal;

use crate::{amount::exact_add, ledger::CampaignLedger};

impl CampaignLedger {
    /// Donate `amount` from `donor` to campaign `id` at `now`.
    ///
    /// Checks run in a fixed order, so a caller always sees the first
    /// failing one:
    /// 1. `amount` is non-zero (then: non-negative)
    /// 2. the campaign exists
    /// 3. `now <= deadline` and the campaign is not paid out
    ///
    /// Emits `DonationReceived`.
    ///
    /// # Errors
    /// - `CannotDonateZero` / `NegativeAmount` for a bad amount
    /// - `InvalidCampaign(id)` if the campaign was never created
    /// - `CampaignInactive` if the deadline has passed
    /// - `AmountOverflow` if a total would leave the representable range
    /// - `InexactAmount` if a total would need rounding
    pub fn donate(
        &mut self,
        donor: AccountId,
        id: CampaignId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if amount.is_zero() {
            return Err(FundraiseError::CannotDonateZero);
        }
        if amount.is_sign_negative() {
            return Err(FundraiseError::NegativeAmount(amount));
        }

        let campaign = self.registry.lookup_mut(id)?;
        if !campaign.accepts_donations_at(now) {
            return Err(FundraiseError::CampaignInactive);
        }

        // Compute both sums before writing either; neither may round.
        let raised = exact_add(campaign.amount_raised, amount)?;
        let outstanding = exact_add(self.total_outstanding, amount)?;

        campaign.amount_raised = raised;
        self.total_outstanding = outstanding;

        tracing::debug!(
            campaign = %id,
            donor = %donor,
            amount = %amount,
            raised = %raised,
            "Donation accepted"
        );
        self.emit(
            LedgerEventKind::DonationReceived {
                campaign: id,
                donor,
                amount,
            },
            now,
        );
        Ok(())
    }
}
