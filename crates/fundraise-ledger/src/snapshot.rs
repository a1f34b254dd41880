//! Ledger snapshots for the embedder's storage engine.
//!
//! A snapshot captures campaigns, the outstanding total and the event
//! sequence counter. The creator index is not stored: every campaign's
//! recipient is its creator, so the index is rebuilt from the campaigns in
//! ID order. Undrained events are not part of a snapshot, and no snapshot
//! is taken while a payout is in flight.
//!
//! The `digest` is a SHA-256 over a canonical encoding of the state. Restore
//! recomputes it and re-runs the conservation audit before accepting.

use chrono::{DateTime, Utc};
use fundraise_types::{Campaign, FundraiseError, LedgerConfig, Result, constants};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ledger::CampaignLedger, registry::CampaignRegistry};

/// Serializable capture of a [`CampaignLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub config: LedgerConfig,
    /// All campaigns in ID order.
    pub campaigns: Vec<Campaign>,
    pub total_outstanding: Decimal,
    pub next_event_sequence: u64,
    pub taken_at: DateTime<Utc>,
    /// Hex-encoded SHA-256 of the state fields above (excluding `taken_at`).
    pub digest: String,
}

impl LedgerSnapshot {
    /// Canonical state digest.
    #[must_use]
    pub fn compute_digest(
        campaigns: &[Campaign],
        total_outstanding: Decimal,
        next_event_sequence: u64,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::SNAPSHOT_DIGEST_DOMAIN);
        hasher.update((campaigns.len() as u64).to_le_bytes());

        for c in campaigns {
            hasher.update(c.id.0.to_le_bytes());
            hasher.update(c.recipient.as_bytes());
            hasher.update((c.title.len() as u64).to_le_bytes());
            hasher.update(c.title.as_bytes());
            hasher.update((c.description.len() as u64).to_le_bytes());
            hasher.update(c.description.as_bytes());
            hasher.update(c.goal.to_string().as_bytes());
            hasher.update(c.deadline.timestamp_millis().to_le_bytes());
            hasher.update(c.created_at.timestamp_millis().to_le_bytes());
            hasher.update(c.amount_raised.to_string().as_bytes());
            hasher.update([u8::from(c.is_paid_out)]);
        }

        hasher.update(total_outstanding.to_string().as_bytes());
        hasher.update(next_event_sequence.to_le_bytes());

        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        digest
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl CampaignLedger {
    /// Capture the current state.
    ///
    /// # Errors
    /// Returns `PayoutInFlight` while a committed payout is waiting on its
    /// transfer: the outcome decides whether the campaign is settled, so
    /// there is no consistent state to capture yet.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<LedgerSnapshot> {
        if let Some(id) = self.payouts_in_flight().next() {
            return Err(FundraiseError::PayoutInFlight(id));
        }
        let campaigns = self.registry.as_slice().to_vec();
        let digest =
            LedgerSnapshot::compute_digest(&campaigns, self.total_outstanding, self.next_sequence);
        Ok(LedgerSnapshot {
            version: constants::SNAPSHOT_VERSION,
            config: self.config.clone(),
            campaigns,
            total_outstanding: self.total_outstanding,
            next_event_sequence: self.next_sequence,
            taken_at: now,
            digest: hex::encode(digest),
        })
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// # Errors
    /// - `Serialization` for an unknown version or non-dense campaign IDs
    /// - `Configuration` for unusable limits
    /// - `SnapshotDigestMismatch` if the state was altered
    /// - `ConservationViolation` if the totals do not add up
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self> {
        if snapshot.version != constants::SNAPSHOT_VERSION {
            return Err(FundraiseError::Serialization(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        snapshot.config.validate()?;

        let actual = hex::encode(LedgerSnapshot::compute_digest(
            &snapshot.campaigns,
            snapshot.total_outstanding,
            snapshot.next_event_sequence,
        ));
        if actual != snapshot.digest {
            return Err(FundraiseError::SnapshotDigestMismatch {
                expected: snapshot.digest,
                actual,
            });
        }

        let registry = CampaignRegistry::from_campaigns(snapshot.campaigns)?;
        let ledger = Self::from_parts(
            snapshot.config,
            registry,
            snapshot.total_outstanding,
            snapshot.next_event_sequence,
        );
        ledger.verify_conservation()?;

        tracing::info!(
            campaigns = ledger.total_campaigns(),
            outstanding = %ledger.total_outstanding,
            "Ledger restored from snapshot"
        );
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use fundraise_types::AccountId;

    use super::*;
    use crate::fixtures;

    fn populated() -> CampaignLedger {
        let (mut ledger, first, start) = fixtures::funded_ledger(Decimal::new(40, 0));
        let creator = ledger.campaign(first).unwrap().recipient;
        let second = ledger
            .create_campaign(creator, "Second", "", Decimal::TEN, Duration::hours(1), start)
            .unwrap();
        ledger
            .donate(AccountId::new(), second, Decimal::new(15, 1), start)
            .unwrap();

        let later = start + Duration::seconds(61);
        let pending = ledger.commit_payout(first, later).unwrap();
        let _ = ledger.confirm_payout(pending, later);
        ledger.drain_events();
        ledger
    }

    #[test]
    fn restore_preserves_queries() {
        let ledger = populated();
        let json = ledger.snapshot(fixtures::t0()).unwrap().to_json().unwrap();
        let restored = CampaignLedger::restore(LedgerSnapshot::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored.total_campaigns(), ledger.total_campaigns());
        assert_eq!(restored.total_funding(), ledger.total_funding());
        let creator = ledger.campaign(fundraise_types::CampaignId(0)).unwrap().recipient;
        assert_eq!(restored.user_campaigns(&creator), ledger.user_campaigns(&creator));
        assert_eq!(restored.registry().as_slice(), ledger.registry().as_slice());
    }

    #[test]
    fn restore_continues_event_sequence() {
        let ledger = populated();
        let mut restored =
            CampaignLedger::restore(ledger.snapshot(fixtures::t0()).unwrap()).unwrap();
        restored
            .create_campaign(
                AccountId::new(),
                "Third",
                "",
                Decimal::ONE,
                Duration::seconds(60),
                fixtures::t0(),
            )
            .unwrap();
        assert_eq!(restored.drain_events()[0].sequence, ledger.next_sequence);
    }

    #[test]
    fn tampered_snapshot_rejected() {
        let mut snapshot = populated().snapshot(fixtures::t0()).unwrap();
        snapshot.campaigns[1].amount_raised = Decimal::new(1_000, 0);
        let err = CampaignLedger::restore(snapshot).unwrap_err();
        assert!(matches!(err, FundraiseError::SnapshotDigestMismatch { .. }));
    }

    #[test]
    fn inconsistent_totals_rejected_even_with_valid_digest() {
        let mut snapshot = populated().snapshot(fixtures::t0()).unwrap();
        snapshot.total_outstanding = Decimal::new(99, 0);
        snapshot.digest = hex::encode(LedgerSnapshot::compute_digest(
            &snapshot.campaigns,
            snapshot.total_outstanding,
            snapshot.next_event_sequence,
        ));
        let err = CampaignLedger::restore(snapshot).unwrap_err();
        assert!(matches!(err, FundraiseError::ConservationViolation { .. }));
    }

    #[test]
    fn unknown_version_rejected() {
        let mut snapshot = populated().snapshot(fixtures::t0()).unwrap();
        snapshot.version = 99;
        assert!(matches!(
            CampaignLedger::restore(snapshot),
            Err(FundraiseError::Serialization(_))
        ));
    }

    #[test]
    fn digest_is_deterministic() {
        let ledger = populated();
        let a = ledger.snapshot(fixtures::t0()).unwrap();
        let b = ledger.snapshot(fixtures::t0() + Duration::days(3)).unwrap();
        assert_eq!(a.digest, b.digest, "taken_at is not part of the digest");
    }

    #[test]
    fn snapshot_refused_while_payout_in_flight() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::new(5, 0));
        let later = start + Duration::seconds(61);
        let pending = ledger.commit_payout(id, later).unwrap();

        let err = ledger.snapshot(later).unwrap_err();
        assert!(matches!(err, FundraiseError::PayoutInFlight(c) if c == id));

        ledger.revert_payout(pending).unwrap();
        let restored = CampaignLedger::restore(ledger.snapshot(later).unwrap()).unwrap();
        assert!(!restored.campaign(id).unwrap().is_paid_out);
        assert_eq!(restored.total_funding(), Decimal::new(5, 0));
    }

    #[test]
    fn garbage_json_is_serialization_error() {
        let err = LedgerSnapshot::from_json("[]").unwrap_err();
        assert!(matches!(err, FundraiseError::Serialization(_)));
    }
}
