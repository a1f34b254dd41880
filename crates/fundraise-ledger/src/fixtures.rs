//! Deterministic ledger fixtures. **Test use only.**

use chrono::{DateTime, Duration, Utc};
use fundraise_types::{AccountId, CampaignId};
use rust_decimal::Decimal;

use crate::CampaignLedger;

/// 2024-01-01T00:00:00Z.
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

/// A ledger holding one campaign created at [`t0`] with a 60 second
/// duration and a single donation of `raised` (skipped when zero).
///
/// Returns the ledger, the campaign ID, and the creation instant.
pub fn funded_ledger(raised: Decimal) -> (CampaignLedger, CampaignId, DateTime<Utc>) {
    let start = t0();
    let mut ledger = CampaignLedger::new();
    let id = ledger
        .create_campaign(
            AccountId::new(),
            "Community garden",
            "Seeds and tools",
            Decimal::new(100, 0),
            Duration::seconds(60),
            start,
        )
        .expect("fixture campaign is valid");
    if !raised.is_zero() {
        ledger
            .donate(AccountId::new(), id, raised, start)
            .expect("fixture donation is valid");
    }
    (ledger, id, start)
}
