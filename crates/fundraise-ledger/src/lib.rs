//! # fundraise-ledger
//!
//! **Campaign Registry**, **Contribution Ledger**, and **Query Facade** for
//! the Fundraise campaign ledger, plus the bookkeeping half of settlement.
//!
//! ## Architecture
//!
//! [`CampaignLedger`] owns all mutable state:
//! 1. **CampaignRegistry**: campaign records and the per-creator index
//! 2. **Contribution ledger**: `donate()` updates a campaign's raised amount
//!    and the global outstanding total in one step
//! 3. **Payout bookkeeping**: `commit_payout()` / `confirm_payout()` /
//!    `revert_payout()`, driven by the settlement engine
//! 4. **Conservation**: recomputes the outstanding total from the campaigns
//! 5. **Snapshot**: digest-protected JSON capture and restore
//!
//! ## Invariant
//!
//! ```text
//! total_outstanding == Σ campaign.amount_raised  (∀ campaign: !is_paid_out)
//! ```
//!
//! Every mutation takes `&mut self`, so each operation is one indivisible
//! step; no other code can observe a half-applied change.

mod amount;
pub mod conservation;
pub mod contribution;
pub mod ledger;
pub mod payout;
pub mod query;
pub mod registry;
pub mod snapshot;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;

pub use conservation::{ConservationReport, audit_campaigns};
pub use ledger::CampaignLedger;
pub use payout::{PendingPayout, Settlement};
pub use registry::{CampaignRegistry, NewCampaign};
pub use snapshot::LedgerSnapshot;
