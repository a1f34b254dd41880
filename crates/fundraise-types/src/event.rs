//! Ledger notifications.
//!
//! Every successful mutation appends one [`LedgerEvent`] to the ledger's
//! outbox. Events are a side channel for external observers; nothing in the
//! ledger reads them back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, CampaignId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEventKind {
    CampaignCreated {
        campaign: CampaignId,
        creator: AccountId,
    },
    DonationReceived {
        campaign: CampaignId,
        donor: AccountId,
        amount: Decimal,
    },
    CampaignEnded {
        recipient: AccountId,
        campaign: CampaignId,
        amount: Decimal,
    },
}

impl LedgerEventKind {
    /// The campaign this event concerns.
    #[must_use]
    pub fn campaign(&self) -> CampaignId {
        match self {
            Self::CampaignCreated { campaign, .. }
            | Self::DonationReceived { campaign, .. }
            | Self::CampaignEnded { campaign, .. } => *campaign,
        }
    }
}

impl std::fmt::Display for LedgerEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CampaignCreated { .. } => write!(f, "CAMPAIGN_CREATED"),
            Self::DonationReceived { .. } => write!(f, "DONATION_RECEIVED"),
            Self::CampaignEnded { .. } => write!(f, "CAMPAIGN_ENDED"),
        }
    }
}

/// A sequenced notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Per-ledger sequence number, starting at 0, gap-free.
    pub sequence: u64,
    pub kind: LedgerEventKind,
    pub recorded_at: DateTime<Utc>,
}
