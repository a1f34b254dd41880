//! # Campaign: the funding record
//!
//! ## Lifecycle
//!
//! ```text
//!   accepting donations ──(deadline)──▶ matured ──(settlement)──▶ paid out
//! ```
//!
//! The deadline instant belongs to both phases: a donation made exactly at
//! the deadline is accepted, and settlement at the same instant is also
//! allowed.
//!
//! `is_paid_out` is terminal. Once set, `amount_raised` is zero and the
//! campaign never accepts donations or settlement again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, CampaignId};

/// One funding effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Sequential ID assigned at creation.
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    /// The creating caller; receives the payout.
    pub recipient: AccountId,
    /// Target amount. Informational only, never gates donations or settlement.
    pub goal: Decimal,
    /// After this instant the campaign stops accepting donations.
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Sum of accepted donations. Zero after settlement.
    pub amount_raised: Decimal,
    /// Set exactly once, by a successful settlement.
    pub is_paid_out: bool,
}

impl Campaign {
    /// Donations are accepted up to and including the deadline instant.
    #[must_use]
    pub fn accepts_donations_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_paid_out && now <= self.deadline
    }

    /// Settlement may begin once `now` has reached the deadline.
    #[must_use]
    pub fn is_matured_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Whether donations so far meet the goal. Always `false` once paid out,
    /// since the raised amount is reset at settlement.
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.amount_raised >= self.goal
    }
}

/// Dummy campaign for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Campaign {
    /// An unfunded campaign with goal 1 that ends one minute after `created_at`.
    pub fn dummy(id: CampaignId, recipient: AccountId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: format!("campaign {}", id.0),
            description: String::new(),
            recipient,
            goal: Decimal::ONE,
            deadline: created_at + chrono::Duration::seconds(60),
            created_at,
            amount_raised: Decimal::ZERO,
            is_paid_out: false,
        }
    }
}
