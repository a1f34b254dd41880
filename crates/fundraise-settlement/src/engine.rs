//! Settlement engine.
//!
//! Drives the ledger's commit / confirm / revert bookkeeping around one call
//! to the external transfer rail. If the transfer fails, the campaign is
//! restored exactly as it was and the error is returned as `PayoutFailed`.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use chrono::{DateTime, Utc};
use fundraise_ledger::{CampaignLedger, PendingPayout, Settlement};
use fundraise_types::{CampaignId, FundraiseError, Result, TransferError};

use crate::transfer::PayoutTransfer;

/// Pays out matured campaigns through a [`PayoutTransfer`].
pub struct SettlementEngine<T> {
    transfer: T,
}

impl<T: PayoutTransfer> SettlementEngine<T> {
    #[must_use]
    pub fn new(transfer: T) -> Self {
        Self { transfer }
    }

    /// The transfer rail this engine pays through.
    #[must_use]
    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Settle campaign `id` at `now`: commit, transfer, then confirm or
    /// roll back.
    ///
    /// The ledger stays mutably borrowed for the whole call, so the transfer
    /// cannot reach it.
    ///
    /// # Errors
    /// - `InvalidCampaign`, `CampaignNotEnded`, `CampaignInactive`,
    ///   `NoFundsRaised` from the precondition checks (nothing changes)
    /// - `PayoutFailed` if the transfer failed (everything rolled back)
    pub fn end_campaign(
        &self,
        ledger: &mut CampaignLedger,
        id: CampaignId,
        now: DateTime<Utc>,
    ) -> Result<Settlement> {
        let pending = ledger.commit_payout(id, now)?;
        let outcome = self.execute(&pending);
        resolve(ledger, pending, outcome, now)
    }

    /// Run the external transfer for a committed payout.
    ///
    /// A panicking rail is reported as `Unavailable`, so the caller still
    /// reverts the committed bookkeeping.
    pub fn execute(&self, pending: &PendingPayout) -> std::result::Result<(), TransferError> {
        tracing::debug!(
            campaign = %pending.campaign(),
            recipient = %pending.recipient(),
            amount = %pending.amount(),
            "Executing payout transfer"
        );
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.transfer
                .transfer(pending.recipient(), pending.amount())
        }))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                campaign = %pending.campaign(),
                panic = %message,
                "Payout transfer panicked"
            );
            Err(TransferError::Unavailable(format!(
                "transfer panicked: {message}"
            )))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Confirm or roll back a committed payout depending on the transfer outcome.
pub(crate) fn resolve(
    ledger: &mut CampaignLedger,
    pending: PendingPayout,
    outcome: std::result::Result<(), TransferError>,
    now: DateTime<Utc>,
) -> Result<Settlement> {
    match outcome {
        Ok(()) => Ok(ledger.confirm_payout(pending, now)),
        Err(err) => {
            tracing::warn!(
                campaign = %pending.campaign(),
                recipient = %pending.recipient(),
                amount = %pending.amount(),
                error = %err,
                "Payout transfer failed, rolling back"
            );
            ledger.revert_payout(pending)?;
            Err(FundraiseError::PayoutFailed(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use fundraise_ledger::fixtures;
    use fundraise_types::LedgerEventKind;
    use rust_decimal::Decimal;

    use super::*;
    use crate::transfer::CustodyTransfer;

    fn matured(start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::seconds(61)
    }

    #[test]
    fn successful_settlement_pays_recipient() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::new(80, 0));
        let recipient = ledger.campaign(id).unwrap().recipient;
        let engine = SettlementEngine::new(CustodyTransfer::new());

        let settlement = engine.end_campaign(&mut ledger, id, matured(start)).unwrap();
        assert_eq!(settlement.amount, Decimal::new(80, 0));
        assert_eq!(settlement.recipient, recipient);
        assert_eq!(engine.transfer().balance_of(&recipient), Decimal::new(80, 0));
        assert_eq!(ledger.total_funding(), Decimal::ZERO);
        assert!(ledger.campaign(id).unwrap().is_paid_out);
    }

    #[test]
    fn second_settlement_is_inactive() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::ONE);
        let engine = SettlementEngine::new(CustodyTransfer::new());
        engine.end_campaign(&mut ledger, id, matured(start)).unwrap();

        let err = engine
            .end_campaign(&mut ledger, id, matured(start))
            .unwrap_err();
        assert!(matches!(err, FundraiseError::CampaignInactive));
        assert_eq!(engine.transfer().total_paid(), Decimal::ONE, "paid exactly once");
    }

    #[test]
    fn failed_transfer_rolls_back() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::new(9, 0));
        ledger.drain_events();
        let recipient = ledger.campaign(id).unwrap().recipient;
        let before = ledger.campaign(id).cloned().unwrap();
        let engine = SettlementEngine::new(CustodyTransfer::new());
        engine.transfer().refuse(recipient);

        let err = engine
            .end_campaign(&mut ledger, id, matured(start))
            .unwrap_err();
        assert!(matches!(
            err,
            FundraiseError::PayoutFailed(TransferError::Rejected { .. })
        ));
        assert_eq!(ledger.campaign(id), Some(&before));
        assert_eq!(ledger.total_funding(), Decimal::new(9, 0));
        assert!(ledger.pending_events().is_empty(), "no CampaignEnded on failure");
        ledger.verify_conservation().unwrap();

        // Caller fixes the rail and retries.
        engine.transfer().accept(recipient);
        let settlement = engine.end_campaign(&mut ledger, id, matured(start)).unwrap();
        assert_eq!(settlement.amount, Decimal::new(9, 0));
    }

    #[test]
    fn settlement_emits_campaign_ended() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::TEN);
        ledger.drain_events();
        let engine = SettlementEngine::new(CustodyTransfer::new());
        engine.end_campaign(&mut ledger, id, matured(start)).unwrap();

        let events = ledger.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            LedgerEventKind::CampaignEnded { campaign, amount, .. }
                if campaign == id && amount == Decimal::TEN
        ));
    }

    #[test]
    fn preconditions_checked_before_transfer() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::ONE);
        let engine = SettlementEngine::new(CustodyTransfer::new());

        let err = engine.end_campaign(&mut ledger, id, start).unwrap_err();
        assert!(matches!(err, FundraiseError::CampaignNotEnded { .. }));
        assert_eq!(engine.transfer().total_paid(), Decimal::ZERO);
    }

    struct PanickingTransfer;

    impl PayoutTransfer for PanickingTransfer {
        fn transfer(
            &self,
            _recipient: fundraise_types::AccountId,
            _amount: Decimal,
        ) -> std::result::Result<(), TransferError> {
            panic!("rail crashed");
        }
    }

    #[test]
    fn panicking_transfer_rolls_back() {
        let (mut ledger, id, start) = fixtures::funded_ledger(Decimal::new(6, 0));
        let before = ledger.campaign(id).cloned().unwrap();
        let engine = SettlementEngine::new(PanickingTransfer);

        let err = engine
            .end_campaign(&mut ledger, id, matured(start))
            .unwrap_err();
        match err {
            FundraiseError::PayoutFailed(TransferError::Unavailable(reason)) => {
                assert!(reason.contains("rail crashed"), "got: {reason}");
            }
            other => panic!("expected PayoutFailed, got {other}"),
        }
        assert_eq!(ledger.campaign(id), Some(&before));
        assert_eq!(ledger.total_funding(), Decimal::new(6, 0));
        assert_eq!(ledger.payouts_in_flight().count(), 0);
        ledger.verify_conservation().unwrap();
    }
}
