//! ERC20-style token collaborator seam.
//!
//! The pool sees the token contract through [`TokenContract`], phrased
//! from the pool's perspective: allowances granted *to the pool*,
//! transfers *into* and *out of* pool custody.  Standard fungible-token
//! semantics are assumed — no transfer fees, no rebasing.
//!
//! Every outbound call hands the token a `&mut dyn PoolEntry` context.
//! A conforming token ignores it; a hostile one may use it to attempt a
//! callback into the pool mid-transfer, which is exactly the reentrancy
//! surface the guard layer exists to close.

use std::collections::HashMap;

use crate::domain::{Address, Amount};
use crate::error::{PoolError, Result};
use crate::pool::PoolEntry;

/// The token contract as seen from the pool.
pub trait TokenContract {
    /// Returns the amount `owner` has approved the pool to pull.
    fn allowance(&self, owner: Address) -> Amount;

    /// Pulls `amount` from `owner` into pool custody, consuming allowance.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TransferFailed`] if the owner's balance or
    /// allowance cannot cover the transfer.
    fn transfer_from(
        &mut self,
        pool: &mut dyn PoolEntry,
        owner: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Pushes `amount` from pool custody to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TransferFailed`] if pool custody cannot cover
    /// the transfer.
    fn transfer(
        &mut self,
        pool: &mut dyn PoolEntry,
        recipient: Address,
        amount: Amount,
    ) -> Result<()>;
}

/// In-memory reference implementation of [`TokenContract`].
///
/// Backs the demo and the test suites; tracks per-owner balances, the
/// pool's custodial balance, and per-owner allowances granted to the
/// pool.
#[derive(Debug, Clone, Default)]
pub struct MemoryToken {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<Address, Amount>,
    pool_balance: Amount,
}

impl MemoryToken {
    /// Creates a token with no balances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `owner` out of thin air (test/demo setup).
    pub fn mint_to(&mut self, owner: Address, amount: Amount) {
        let balance = self.balance_of(owner).checked_add(amount);
        if let Some(balance) = balance {
            self.balances.insert(owner, balance);
        }
    }

    /// Sets the pool's allowance for `owner`, replacing any prior value.
    ///
    /// Mirrors `IERC20::approve(pool, amount)`.
    pub fn approve(&mut self, owner: Address, amount: Amount) {
        self.allowances.insert(owner, amount);
    }

    /// Returns the balance of `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> Amount {
        self.balances.get(&owner).copied().unwrap_or(Amount::ZERO)
    }

    /// Returns the pool's custodial balance.
    #[must_use]
    pub const fn pool_balance(&self) -> Amount {
        self.pool_balance
    }
}

impl TokenContract for MemoryToken {
    fn allowance(&self, owner: Address) -> Amount {
        self.allowances.get(&owner).copied().unwrap_or(Amount::ZERO)
    }

    fn transfer_from(
        &mut self,
        _pool: &mut dyn PoolEntry,
        owner: Address,
        amount: Amount,
    ) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self
            .balance_of(owner)
            .checked_sub(amount)
            .ok_or(PoolError::TransferFailed("owner balance too low"))?;
        let allowance = self
            .allowance(owner)
            .checked_sub(amount)
            .ok_or(PoolError::TransferFailed("allowance too low"))?;
        let custody = self
            .pool_balance
            .checked_add(amount)
            .ok_or(PoolError::TransferFailed("custody balance overflow"))?;
        self.balances.insert(owner, balance);
        self.allowances.insert(owner, allowance);
        self.pool_balance = custody;
        Ok(())
    }

    fn transfer(
        &mut self,
        _pool: &mut dyn PoolEntry,
        recipient: Address,
        amount: Amount,
    ) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let custody = self
            .pool_balance
            .checked_sub(amount)
            .ok_or(PoolError::TransferFailed("pool custody too low"))?;
        let balance = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or(PoolError::TransferFailed("recipient balance overflow"))?;
        self.pool_balance = custody;
        self.balances.insert(recipient, balance);
        Ok(())
    }
}
