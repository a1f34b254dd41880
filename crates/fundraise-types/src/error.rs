//! Error types for the Fundraise campaign ledger.
//!
//! All errors use the `FR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by kind:
//! - 1xx: Validation errors (bad parameters, bad amounts)
//! - 2xx: Lookup errors (unknown campaign)
//! - 3xx: Temporal-state errors (deadline, already settled, nothing raised)
//! - 4xx: External-effect errors (payout transfer)
//! - 8xx: Invariant errors
//! - 9xx: General / internal errors
//!
//! Every error is returned to the caller; the ledger never retries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, CampaignId};

/// Why a `create_campaign` call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("goal must be greater than zero")]
    GoalZero,

    #[error("goal must not be negative")]
    NegativeGoal,

    /// Zero and negative durations both land here.
    #[error("duration must be greater than zero")]
    DurationZero,

    #[error("duration exceeds the maximum of {max_secs}s")]
    DurationTooLong { max_secs: u64 },

    #[error("title exceeds {max} bytes")]
    TitleTooLong { max: usize },

    #[error("description exceeds {max} bytes")]
    DescriptionTooLong { max: usize },
}

/// Failure reported by the external payout capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The recipient (or its custodian) refused the funds.
    #[error("recipient {recipient} rejected the transfer: {reason}")]
    Rejected { recipient: AccountId, reason: String },

    /// The transfer rail could not be reached or is not accepting work.
    #[error("transfer rail unavailable: {0}")]
    Unavailable(String),
}

/// Central error enum for all Fundraise operations.
#[derive(Debug, Error)]
pub enum FundraiseError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Campaign creation parameters were rejected.
    #[error("FR_ERR_100: Invalid parameters: {0}")]
    InvalidParameters(ParameterError),

    /// A donation of zero was attempted.
    #[error("FR_ERR_101: Cannot donate zero")]
    CannotDonateZero,

    /// A donation with a negative amount was attempted.
    #[error("FR_ERR_102: Donation amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    /// Adding the amount would exceed the representable range.
    #[error("FR_ERR_103: Amount overflow")]
    AmountOverflow,

    /// The sum needs more precision than a decimal holds and would be rounded.
    #[error("FR_ERR_104: Amount {0} cannot be added without rounding")]
    InexactAmount(Decimal),

    // =================================================================
    // Lookup Errors (2xx)
    // =================================================================
    /// No campaign was ever created with this ID.
    #[error("FR_ERR_200: Invalid campaign: {0}")]
    InvalidCampaign(CampaignId),

    // =================================================================
    // Temporal-State Errors (3xx)
    // =================================================================
    /// The campaign no longer accepts donations, or has already been paid out.
    #[error("FR_ERR_300: Campaign inactive")]
    CampaignInactive,

    /// Settlement was attempted before the deadline.
    #[error("FR_ERR_301: Campaign not ended: deadline {deadline}")]
    CampaignNotEnded { deadline: DateTime<Utc> },

    /// Settlement was attempted on a campaign that raised nothing.
    #[error("FR_ERR_302: No funds raised")]
    NoFundsRaised,

    /// A payout is committed but its transfer has not resolved yet.
    #[error("FR_ERR_303: Payout in flight for {0}")]
    PayoutInFlight(CampaignId),

    // =================================================================
    // External-Effect Errors (4xx)
    // =================================================================
    /// The payout transfer failed. All settlement bookkeeping was rolled back.
    #[error("FR_ERR_400: Payout failed: {0}")]
    PayoutFailed(#[source] TransferError),

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// The outstanding total no longer matches the per-campaign balances.
    #[error("FR_ERR_800: Conservation invariant violation: {reason}")]
    ConservationViolation { reason: String },

    /// A restored snapshot does not hash to its recorded digest.
    #[error("FR_ERR_801: Snapshot digest mismatch: expected {expected}, got {actual}")]
    SnapshotDigestMismatch { expected: String, actual: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("FR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("FR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, zero limits, etc.).
    #[error("FR_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, FundraiseError>;

impl From<ParameterError> for FundraiseError {
    fn from(err: ParameterError) -> Self {
        Self::InvalidParameters(err)
    }
}

impl From<serde_json::Error> for FundraiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = FundraiseError::InvalidCampaign(CampaignId(1));
        let msg = format!("{err}");
        assert!(msg.starts_with("FR_ERR_200"), "Got: {msg}");
        assert!(msg.contains("campaign:1"));
    }

    #[test]
    fn invalid_parameters_display() {
        let err: FundraiseError = ParameterError::DurationZero.into();
        let msg = format!("{err}");
        assert!(msg.contains("FR_ERR_100"));
        assert!(msg.contains("duration"));
    }

    #[test]
    fn not_ended_carries_deadline() {
        let deadline = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let err = FundraiseError::CampaignNotEnded { deadline };
        assert!(format!("{err}").contains("2023-11-14"));
    }

    #[test]
    fn payout_failed_exposes_source() {
        let err = FundraiseError::PayoutFailed(TransferError::Unavailable("offline".into()));
        let source = std::error::Error::source(&err).expect("source should be set");
        assert!(source.to_string().contains("offline"));
    }

    #[test]
    fn all_errors_have_fr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(FundraiseError::CannotDonateZero),
            Box::new(FundraiseError::NegativeAmount(Decimal::NEGATIVE_ONE)),
            Box::new(FundraiseError::CampaignInactive),
            Box::new(FundraiseError::NoFundsRaised),
            Box::new(FundraiseError::InexactAmount(Decimal::new(4, 28))),
            Box::new(FundraiseError::PayoutInFlight(CampaignId(3))),
            Box::new(FundraiseError::Internal("test".into())),
            Box::new(FundraiseError::ConservationViolation {
                reason: "x".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("FR_ERR_"),
                "Error missing FR_ERR_ prefix: {msg}"
            );
        }
    }
}
