//! # fundraise-settlement
//!
//! **Settlement Engine**: exactly-once payout of a matured campaign to its
//! recipient, plus a thread-safe service wiring the ledger to a clock and a
//! transfer rail.
//!
//! ## Settlement protocol
//!
//! 1. Validate preconditions and commit bookkeeping (campaign marked paid
//!    out, raised amount zeroed, outstanding total reduced)
//! 2. Transfer the full amount to the recipient through [`PayoutTransfer`]
//! 3. On success, emit `CampaignEnded`; on failure, restore every value
//!    committed in step 1 and return `PayoutFailed`
//!
//! Because step 1 completes before step 2 starts, a transfer that calls
//! back into the ledger finds the campaign already settled.
//!
//! Settlement is permissionless: anyone may end a matured campaign.

pub mod engine;
pub mod service;
pub mod transfer;

pub use engine::SettlementEngine;
pub use service::FundingService;
pub use transfer::{CustodyTransfer, PayoutTransfer};
