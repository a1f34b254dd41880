//! Campaign registry: the canonical set of campaigns and the per-creator
//! index.
//!
//! Campaigns are stored densely by ID (`campaigns[id].id == id`), so the
//! next ID is always the current length and no ID is ever reused.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use fundraise_types::{
    AccountId, Campaign, CampaignId, FundraiseError, LedgerConfig, ParameterError, Result,
};
use rust_decimal::Decimal;

/// Owns every campaign record and the creator index.
#[derive(Debug, Clone, Default)]
pub struct CampaignRegistry {
    /// All campaigns, indexed by `CampaignId`.
    campaigns: Vec<Campaign>,
    /// Creator → campaign IDs, in creation order. Append-only.
    by_creator: HashMap<AccountId, Vec<CampaignId>>,
}

/// Arguments for a new campaign, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub goal: Decimal,
    pub duration: Duration,
}

impl NewCampaign {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        goal: Decimal,
        duration: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            goal,
            duration,
        }
    }

    /// Check the request against `config`.
    ///
    /// Goal and duration are checked first, in that order, then the
    /// configured limits.
    pub fn validate(&self, config: &LedgerConfig) -> std::result::Result<(), ParameterError> {
        if self.goal.is_zero() {
            return Err(ParameterError::GoalZero);
        }
        if self.goal.is_sign_negative() {
            return Err(ParameterError::NegativeGoal);
        }
        if self.duration <= Duration::zero() {
            return Err(ParameterError::DurationZero);
        }

        let max_secs = config.max_campaign_duration_secs;
        let max_ms = i64::try_from(max_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        if self.duration.num_milliseconds() > max_ms {
            return Err(ParameterError::DurationTooLong { max_secs });
        }
        if self.title.len() > config.max_title_len {
            return Err(ParameterError::TitleTooLong {
                max: config.max_title_len,
            });
        }
        if self.description.len() > config.max_description_len {
            return Err(ParameterError::DescriptionTooLong {
                max: config.max_description_len,
            });
        }
        Ok(())
    }
}

impl CampaignRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from a dense, ordered list of campaigns.
    ///
    /// The creator index is derived from each campaign's recipient, which is
    /// always its creator.
    ///
    /// # Errors
    /// Returns [`FundraiseError::Serialization`] if the IDs are not exactly
    /// `0..len` in order.
    pub fn from_campaigns(campaigns: Vec<Campaign>) -> Result<Self> {
        let mut by_creator: HashMap<AccountId, Vec<CampaignId>> = HashMap::new();
        for (position, campaign) in campaigns.iter().enumerate() {
            if campaign.id.index() != Some(position) {
                return Err(FundraiseError::Serialization(format!(
                    "campaign at position {position} has id {}",
                    campaign.id
                )));
            }
            by_creator
                .entry(campaign.recipient)
                .or_default()
                .push(campaign.id);
        }
        Ok(Self {
            campaigns,
            by_creator,
        })
    }

    /// Validate and store a new campaign created by `creator` at `now`.
    ///
    /// On failure nothing changes: no ID is consumed and the index is
    /// untouched.
    ///
    /// # Errors
    /// Returns [`FundraiseError::InvalidParameters`] if the request fails
    /// validation or its deadline is not representable.
    pub fn register(
        &mut self,
        creator: AccountId,
        request: NewCampaign,
        now: DateTime<Utc>,
        config: &LedgerConfig,
    ) -> Result<CampaignId> {
        request.validate(config)?;

        let deadline = now.checked_add_signed(request.duration).ok_or(
            ParameterError::DurationTooLong {
                max_secs: config.max_campaign_duration_secs,
            },
        )?;

        let id = CampaignId(self.len());
        self.campaigns.push(Campaign {
            id,
            title: request.title,
            description: request.description,
            recipient: creator,
            goal: request.goal,
            deadline,
            created_at: now,
            amount_raised: Decimal::ZERO,
            is_paid_out: false,
        });
        self.by_creator.entry(creator).or_default().push(id);
        Ok(id)
    }

    /// Look up a campaign; `None` if it was never created.
    #[must_use]
    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.get(id.index()?)
    }

    /// Look up a campaign, failing with `InvalidCampaign` if absent.
    pub fn lookup(&self, id: CampaignId) -> Result<&Campaign> {
        self.get(id).ok_or(FundraiseError::InvalidCampaign(id))
    }

    pub(crate) fn lookup_mut(&mut self, id: CampaignId) -> Result<&mut Campaign> {
        id.index()
            .and_then(|i| self.campaigns.get_mut(i))
            .ok_or(FundraiseError::InvalidCampaign(id))
    }

    /// IDs of the campaigns `creator` has created, oldest first.
    #[must_use]
    pub fn campaigns_by(&self, creator: &AccountId) -> &[CampaignId] {
        self.by_creator
            .get(creator)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of campaigns ever created (also the next ID).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.campaigns.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// All campaigns in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.iter()
    }

    /// Campaigns as a slice in ID order.
    #[must_use]
    pub fn as_slice(&self) -> &[Campaign] {
        &self.campaigns
    }
}
