//! Balance derivation
//!
//! A transaction moves `amount` out of `from` and into `to`. Balances can be
//! moved one transaction at a time or rebuilt from opening balances by
//! replaying the whole history oldest first; both paths must agree.

use arthik_store::{Account, Transaction, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Balance per account name
pub type Balances = HashMap<String, Decimal>;

/// Whether a transaction's effect is added or taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Reverse,
}

impl Direction {
    /// Signed deltas for the `from` and `to` legs
    pub fn deltas(&self, amount: Decimal) -> (Decimal, Decimal) {
        match self {
            Direction::Apply => (-amount, amount),
            Direction::Reverse => (amount, -amount),
        }
    }
}

/// Move a transaction's effect on an in-memory balance map.
/// Nothing changes and false is returned when either account is unknown.
pub fn shift(balances: &mut Balances, tx: &Transaction, direction: Direction) -> bool {
    if !balances.contains_key(&tx.from) || !balances.contains_key(&tx.to) {
        return false;
    }
    let (from_delta, to_delta) = direction.deltas(tx.amount);
    if let Some(balance) = balances.get_mut(&tx.from) {
        *balance += from_delta;
    }
    if let Some(balance) = balances.get_mut(&tx.to) {
        *balance += to_delta;
    }
    true
}

/// Sort oldest first: date, then time of day, then id
pub fn sort_for_replay(history: &mut [Transaction]) {
    history.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.time().cmp(&b.time()))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Sort newest first: date descending, then time of day descending
pub fn sort_newest_first(history: &mut [Transaction]) {
    history.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.time().cmp(&a.time()))
            .then_with(|| b.id.cmp(&a.id))
    });
}

pub fn opening_balances(accounts: &[Account]) -> Balances {
    accounts
        .iter()
        .map(|a| (a.name.clone(), a.opening_balance))
        .collect()
}

pub fn current_balances(accounts: &[Account]) -> Balances {
    accounts
        .iter()
        .map(|a| (a.name.clone(), a.balance))
        .collect()
}

/// Outcome of a full replay
#[derive(Debug, Clone, Default)]
pub struct Replay {
    pub balances: Balances,
    pub applied: usize,
    /// Transactions naming an account that does not exist
    pub skipped: Vec<TransactionId>,
}

/// Reset every balance to its opening value and apply the history oldest first.
/// `history` does not need to be sorted.
pub fn replay(accounts: &[Account], history: &[Transaction]) -> Replay {
    let mut ordered = history.to_vec();
    sort_for_replay(&mut ordered);

    let mut result = Replay {
        balances: opening_balances(accounts),
        ..Replay::default()
    };
    for tx in &ordered {
        if shift(&mut result.balances, tx, Direction::Apply) {
            result.applied += 1;
        } else {
            result.skipped.push(tx.id);
        }
    }
    result
}

/// A stored balance that differs from the replayed one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceDrift {
    pub account: String,
    pub stored: Decimal,
    pub derived: Decimal,
}

/// Accounts whose stored balance differs from `derived`, in account order
pub fn drift(accounts: &[Account], derived: &Balances) -> Vec<BalanceDrift> {
    accounts
        .iter()
        .filter_map(|a| {
            let expected = derived.get(&a.name).copied().unwrap_or(a.opening_balance);
            (expected != a.balance).then(|| BalanceDrift {
                account: a.name.clone(),
                stored: a.balance,
                derived: expected,
            })
        })
        .collect()
}
