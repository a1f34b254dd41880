//! Identifiers used throughout Fundraise.
//!
//! Campaign IDs are dense sequential integers handed out by the registry.
//! Account identities use UUIDv7, supplied by whatever runtime
//! authenticates callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CampaignId
// ---------------------------------------------------------------------------

/// Sequential campaign identifier.
///
/// IDs are zero-based, dense, and never reused: the N-th campaign ever
/// created receives `CampaignId(N - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CampaignId(pub u64);

impl CampaignId {
    /// Position of this campaign in a dense, zero-based store.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "campaign:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a participant: campaign creator, donor, or payout recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_id_index() {
        assert_eq!(CampaignId(7).index(), Some(7));
    }

    #[test]
    fn campaign_id_display() {
        assert_eq!(format!("{}", CampaignId(3)), "campaign:3");
    }

    #[test]
    fn account_id_uniqueness() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn account_id_from_bytes_is_stable() {
        let a = AccountId::from_bytes([9; 16]);
        let b = AccountId::from_bytes([9; 16]);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[9; 16]);
    }

    #[test]
    fn serde_roundtrips() {
        let id = CampaignId(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "12");
        let back: CampaignId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let account = AccountId::new();
        let json = serde_json::to_string(&account).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);
    }
}
