//! Balances used to settle the per-write snapshot fee

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::types::Principal;

/// In-process account balances
#[derive(Debug, Clone, Default)]
pub struct Balances {
    accounts: HashMap<Principal, u64>,
}

impl Balances {
    pub fn balance(&self, principal: &str) -> u64 {
        self.accounts.get(principal).copied().unwrap_or(0)
    }

    /// Credit an account, saturating at u64::MAX
    pub fn deposit(&mut self, principal: &str, amount: u64) -> u64 {
        let balance = self.accounts.entry(principal.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
        *balance
    }

    /// Check that `from` can pay `fee` for each of `count` writes to `to`.
    ///
    /// A principal paying itself only needs to cover a single fee.
    pub fn ensure_can_pay(&self, from: &str, to: &str, fee: u64, count: usize) -> LedgerResult<u64> {
        if fee == 0 {
            return Ok(0);
        }
        let total = fee.checked_mul(count as u64);
        let required = if from == to { Some(fee) } else { total };
        let balance = self.balance(from);

        match required {
            Some(required) if balance >= required => Ok(total.unwrap_or(u64::MAX)),
            _ => Err(LedgerError::InsufficientBalance {
                principal: from.to_string(),
                balance,
                required: required.unwrap_or(u64::MAX),
            }),
        }
    }

    /// Settle `count` write fees from `from` to `to` in one step.
    /// Returns the total charged.
    pub fn pay_fees(&mut self, from: &str, to: &str, fee: u64, count: usize) -> LedgerResult<u64> {
        let total = self.ensure_can_pay(from, to, fee, count)?;
        if from != to {
            self.transfer(from, to, total)?;
        }
        Ok(total)
    }

    /// Move `amount` from one account to another; all-or-nothing
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> LedgerResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.balance(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                principal: from.to_string(),
                balance,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        self.accounts.insert(from.to_string(), balance - amount);
        self.deposit(to, amount);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Principal, &u64)> {
        self.accounts.iter()
    }
}
