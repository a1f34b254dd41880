//! Conservation invariant checker.
//!
//! Invariants enforced over every campaign in a ledger:
//! ```text
//! total_outstanding == Σ amount_raised  (∀ campaign: !is_paid_out)
//! is_paid_out ⇒ amount_raised == 0
//! amount_raised >= 0
//! ```
//!
//! The outstanding total is kept as a running counter for O(1) reads; this
//! module recomputes it from scratch. A mismatch means value was created or
//! lost somewhere, which is always a bug.

use fundraise_types::{Campaign, FundraiseError, Result};
use rust_decimal::Decimal;

use crate::{amount::exact_add, ledger::CampaignLedger};

/// Recomputed totals for a set of campaigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConservationReport {
    /// Σ `amount_raised` over campaigns not yet paid out.
    pub outstanding: Decimal,
    /// Campaigns still holding funds or accepting them.
    pub open_campaigns: usize,
    /// Campaigns already paid out.
    pub settled_campaigns: usize,
}

/// Recompute the outstanding total, checking per-campaign invariants.
///
/// # Errors
/// Returns [`FundraiseError::ConservationViolation`] if a paid-out campaign
/// still holds funds, a raised amount is negative, or the sum cannot be
/// represented exactly.
pub fn audit_campaigns<'a>(
    campaigns: impl IntoIterator<Item = &'a Campaign>,
) -> Result<ConservationReport> {
    let mut report = ConservationReport {
        outstanding: Decimal::ZERO,
        open_campaigns: 0,
        settled_campaigns: 0,
    };

    for campaign in campaigns {
        if campaign.amount_raised.is_sign_negative() && !campaign.amount_raised.is_zero() {
            return Err(FundraiseError::ConservationViolation {
                reason: format!(
                    "{} has negative amount raised {}",
                    campaign.id, campaign.amount_raised
                ),
            });
        }
        if campaign.is_paid_out {
            if !campaign.amount_raised.is_zero() {
                return Err(FundraiseError::ConservationViolation {
                    reason: format!(
                        "{} is paid out but still holds {}",
                        campaign.id, campaign.amount_raised
                    ),
                });
            }
            report.settled_campaigns += 1;
            continue;
        }

        report.outstanding = exact_add(report.outstanding, campaign.amount_raised)
            .map_err(|err| FundraiseError::ConservationViolation {
                reason: format!("outstanding sum is not representable: {err}"),
            })?;
        report.open_campaigns += 1;
    }
    Ok(report)
}

impl CampaignLedger {
    /// Recompute the outstanding total and compare it with the running one.
    ///
    /// # Errors
    /// Returns [`FundraiseError::ConservationViolation`] on any mismatch.
    pub fn verify_conservation(&self) -> Result<ConservationReport> {
        let report = audit_campaigns(self.registry.iter()).inspect_err(|err| {
            tracing::error!(error = %err, "Conservation audit failed");
        })?;

        if report.outstanding != self.total_outstanding {
            tracing::error!(
                recorded = %self.total_outstanding,
                recomputed = %report.outstanding,
                "Outstanding total diverged from campaign balances"
            );
            return Err(FundraiseError::ConservationViolation {
                reason: format!(
                    "recorded outstanding {} != recomputed {} over {} open campaigns",
                    self.total_outstanding, report.outstanding, report.open_campaigns
                ),
            });
        }
        Ok(report)
    }
}
