//! Query facade: read-only accessors. Nothing here mutates or fails.

use fundraise_types::{AccountId, Campaign, CampaignId};
use rust_decimal::Decimal;

use crate::ledger::CampaignLedger;

impl CampaignLedger {
    /// Number of campaigns ever created.
    #[must_use]
    pub fn total_campaigns(&self) -> u64 {
        self.registry.len()
    }

    /// Value raised but not yet paid out, across all campaigns.
    #[must_use]
    pub fn total_funding(&self) -> Decimal {
        self.total_outstanding
    }

    /// Campaigns created by `creator`, oldest first. Empty if none.
    #[must_use]
    pub fn user_campaigns(&self, creator: &AccountId) -> &[CampaignId] {
        self.registry.campaigns_by(creator)
    }

    /// The full campaign record, or `None` if `id` was never issued.
    #[must_use]
    pub fn campaign(&self, id: CampaignId) -> Option<&Campaign> {
        self.registry.get(id)
    }

    /// Amount raised by `id`; zero if the campaign does not exist.
    #[must_use]
    pub fn amount_raised(&self, id: CampaignId) -> Decimal {
        self.registry
            .get(id)
            .map_or(Decimal::ZERO, |c| c.amount_raised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn absent_campaign_reads() {
        let ledger = CampaignLedger::new();
        assert!(ledger.campaign(CampaignId(0)).is_none());
        assert_eq!(ledger.amount_raised(CampaignId(0)), Decimal::ZERO);
    }

    #[test]
    fn funded_campaign_reads() {
        let (ledger, id, _) = fixtures::funded_ledger(Decimal::new(12, 0));
        let campaign = ledger.campaign(id).unwrap();
        assert_eq!(campaign.id, id);
        assert_eq!(ledger.amount_raised(id), Decimal::new(12, 0));
        assert_eq!(ledger.total_funding(), Decimal::new(12, 0));
        assert_eq!(ledger.total_campaigns(), 1);
        assert_eq!(ledger.user_campaigns(&campaign.recipient), &[id]);
    }
}
