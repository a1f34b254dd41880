//! # fundraise-types
//!
//! Shared types, errors, and configuration for the **Fundraise** campaign
//! ledger.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`CampaignId`], [`AccountId`]
//! - **Campaign model**: [`Campaign`]
//! - **Event model**: [`LedgerEvent`], [`LedgerEventKind`]
//! - **Time source**: [`Clock`], [`SystemClock`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`FundraiseError`], [`ParameterError`], [`TransferError`]
//!   with `FR_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod campaign;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

pub use campaign::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `fundraise_types::constants::FOO`
// (not re-exported to avoid name collisions).
