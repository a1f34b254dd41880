//! The external value-transfer capability.
//!
//! The ledger never moves value itself; it asks a [`PayoutTransfer`] to pay
//! a recipient and trusts the answer. [`CustodyTransfer`] is an in-memory
//! rail that credits recipient balances, useful for embedding and tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use fundraise_types::{AccountId, TransferError};
use rust_decimal::Decimal;

/// Pays `amount` to `recipient`.
///
/// Implementations may call back into the ledger service; those calls run
/// after settlement bookkeeping has been committed.
pub trait PayoutTransfer: Send + Sync {
    fn transfer(&self, recipient: AccountId, amount: Decimal) -> Result<(), TransferError>;
}

impl<T: PayoutTransfer + ?Sized> PayoutTransfer for Arc<T> {
    fn transfer(&self, recipient: AccountId, amount: Decimal) -> Result<(), TransferError> {
        (**self).transfer(recipient, amount)
    }
}

/// In-memory custody: credits recipients and can be told to refuse some.
#[derive(Debug, Default)]
pub struct CustodyTransfer {
    balances: Mutex<HashMap<AccountId, Decimal>>,
    /// Recipients whose transfers fail.
    refused: Mutex<HashSet<AccountId>>,
}

impl CustodyTransfer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future transfer to `recipient` fail.
    pub fn refuse(&self, recipient: AccountId) {
        if let Ok(mut refused) = self.refused.lock() {
            refused.insert(recipient);
        }
    }

    /// Accept transfers to `recipient` again.
    pub fn accept(&self, recipient: AccountId) {
        if let Ok(mut refused) = self.refused.lock() {
            refused.remove(&recipient);
        }
    }

    /// Value held for `recipient`; zero if never paid.
    #[must_use]
    pub fn balance_of(&self, recipient: &AccountId) -> Decimal {
        self.balances
            .lock()
            .ok()
            .and_then(|b| b.get(recipient).copied())
            .unwrap_or(Decimal::ZERO)
    }

    /// Total value paid out to all recipients.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.balances
            .lock()
            .map(|b| b.values().copied().sum::<Decimal>())
            .unwrap_or(Decimal::ZERO)
    }
}

impl PayoutTransfer for CustodyTransfer {
    fn transfer(&self, recipient: AccountId, amount: Decimal) -> Result<(), TransferError> {
        let refused = self
            .refused
            .lock()
            .map_err(|_| TransferError::Unavailable("custody lock poisoned".into()))?
            .contains(&recipient);
        if refused {
            return Err(TransferError::Rejected {
                recipient,
                reason: "recipient refuses funds".into(),
            });
        }

        let mut balances = self
            .balances
            .lock()
            .map_err(|_| TransferError::Unavailable("custody lock poisoned".into()))?;
        let entry = balances.entry(recipient).or_insert(Decimal::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| TransferError::Unavailable("recipient balance overflow".into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_credits_recipient() {
        let custody = CustodyTransfer::new();
        let alice = AccountId::new();
        custody.transfer(alice, Decimal::new(30, 0)).unwrap();
        custody.transfer(alice, Decimal::new(12, 0)).unwrap();
        assert_eq!(custody.balance_of(&alice), Decimal::new(42, 0));
        assert_eq!(custody.total_paid(), Decimal::new(42, 0));
    }

    #[test]
    fn unknown_recipient_has_zero() {
        let custody = CustodyTransfer::new();
        assert_eq!(custody.balance_of(&AccountId::new()), Decimal::ZERO);
    }

    #[test]
    fn refused_recipient_fails_and_is_not_credited() {
        let custody = CustodyTransfer::new();
        let bob = AccountId::new();
        custody.refuse(bob);

        let err = custody.transfer(bob, Decimal::ONE).unwrap_err();
        assert!(matches!(err, TransferError::Rejected { recipient, .. } if recipient == bob));
        assert_eq!(custody.balance_of(&bob), Decimal::ZERO);

        custody.accept(bob);
        custody.transfer(bob, Decimal::ONE).unwrap();
        assert_eq!(custody.balance_of(&bob), Decimal::ONE);
    }

    #[test]
    fn arc_forwards() {
        let custody = Arc::new(CustodyTransfer::new());
        let alice = AccountId::new();
        PayoutTransfer::transfer(&Arc::clone(&custody), alice, Decimal::TWO).unwrap();
        assert_eq!(custody.balance_of(&alice), Decimal::TWO);
    }
}
