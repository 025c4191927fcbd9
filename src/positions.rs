//! Per-provider liquidity-share accounting.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Address, Shares};
use crate::error::{PoolError, Result};

/// The book of liquidity positions, keyed by provider address.
///
/// # Invariant
///
/// The sum of all position balances equals [`total`](Self::total) at all
/// times: shares enter only through [`mint`](Self::mint) and leave only
/// through [`burn`](Self::burn), and both update the position and the
/// total together.  A position whose balance reaches zero is removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionBook {
    positions: HashMap<Address, Shares>,
    total: Shares,
}

impl PositionBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding share supply.
    #[must_use]
    pub const fn total(&self) -> Shares {
        self.total
    }

    /// Returns the share balance of `owner` (zero if no position exists).
    #[must_use]
    pub fn shares_of(&self, owner: Address) -> Shares {
        self.positions.get(&owner).copied().unwrap_or(Shares::ZERO)
    }

    /// Returns the number of live positions.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.positions.len()
    }

    /// Mints `shares` into the position of `owner`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidAmount`] if `shares` is zero.
    /// - [`PoolError::Overflow`] if the position or the total would
    ///   exceed `u128::MAX`.
    pub fn mint(&mut self, owner: Address, shares: Shares) -> Result<()> {
        if shares.is_zero() {
            return Err(PoolError::InvalidAmount("cannot mint zero shares"));
        }
        let position = self
            .shares_of(owner)
            .checked_add(shares)
            .ok_or(PoolError::Overflow("position share balance"))?;
        let total = self
            .total
            .checked_add(shares)
            .ok_or(PoolError::Overflow("total share supply"))?;
        self.positions.insert(owner, position);
        self.total = total;
        debug!(owner = %owner, minted = %shares, total = %self.total, "shares minted");
        Ok(())
    }

    /// Burns `shares` from the position of `owner`, removing the position
    /// if its balance reaches zero.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidAmount`] if `shares` is zero.
    /// - [`PoolError::InsufficientShares`] if `owner` holds fewer shares
    ///   than requested.
    pub fn burn(&mut self, owner: Address, shares: Shares) -> Result<()> {
        if shares.is_zero() {
            return Err(PoolError::InvalidAmount("cannot burn zero shares"));
        }
        let position = self
            .shares_of(owner)
            .checked_sub(shares)
            .ok_or(PoolError::InsufficientShares)?;
        // The sum invariant guarantees total >= any single position.
        let total = self
            .total
            .checked_sub(shares)
            .ok_or(PoolError::InsufficientShares)?;
        if position.is_zero() {
            self.positions.remove(&owner);
        } else {
            self.positions.insert(owner, position);
        }
        self.total = total;
        debug!(owner = %owner, burned = %shares, total = %self.total, "shares burned");
        Ok(())
    }
}
