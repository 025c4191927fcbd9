//! Reserve ledger for the pool's two asset balances.

use tracing::debug;

use crate::domain::{Amount, Asset};
use crate::error::{PoolError, Result};

/// Holds the pool's custodial balances of both assets.
///
/// Mutations go through [`credit`](Self::credit) and
/// [`debit`](Self::debit) only; each emits a tracing event carrying the
/// post-mutation reserves.  The invariant product is read through
/// [`current_product`](Self::current_product), which fails on overflow
/// rather than wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReserveLedger {
    base: Amount,
    token: Amount,
}

impl ReserveLedger {
    /// Creates a ledger with both reserves at zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            base: Amount::ZERO,
            token: Amount::ZERO,
        }
    }

    /// Returns the base-currency reserve.
    #[must_use]
    pub const fn base(&self) -> Amount {
        self.base
    }

    /// Returns the token reserve.
    #[must_use]
    pub const fn token(&self) -> Amount {
        self.token
    }

    /// Returns the reserve on the given side.
    #[must_use]
    pub const fn reserve(&self, asset: Asset) -> Amount {
        match asset {
            Asset::Base => self.base,
            Asset::Token => self.token,
        }
    }

    /// Returns `true` if either reserve is zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.base.is_zero() || self.token.is_zero()
    }

    /// Increases one reserve.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the reserve would exceed
    /// `u128::MAX`.
    pub fn credit(&mut self, asset: Asset, amount: Amount) -> Result<()> {
        let updated = self
            .reserve(asset)
            .checked_add(amount)
            .ok_or(PoolError::Overflow("reserve credit"))?;
        self.set(asset, updated);
        debug!(
            asset = %asset,
            amount = %amount,
            reserve_base = %self.base,
            reserve_token = %self.token,
            "reserve credited"
        );
        Ok(())
    }

    /// Decreases one reserve.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InsufficientReserve`] if `amount` exceeds the
    /// current reserve.
    pub fn debit(&mut self, asset: Asset, amount: Amount) -> Result<()> {
        let updated = self
            .reserve(asset)
            .checked_sub(amount)
            .ok_or(PoolError::InsufficientReserve)?;
        self.set(asset, updated);
        debug!(
            asset = %asset,
            amount = %amount,
            reserve_base = %self.base,
            reserve_token = %self.token,
            "reserve debited"
        );
        Ok(())
    }

    /// Returns `reserve_base * reserve_token` with checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the product exceeds `u128::MAX`.
    pub fn current_product(&self) -> Result<u128> {
        self.base
            .get()
            .checked_mul(self.token.get())
            .ok_or(PoolError::Overflow("reserve product"))
    }

    fn set(&mut self, asset: Asset, value: Amount) {
        match asset {
            Asset::Base => self.base = value,
            Asset::Token => self.token = value,
        }
    }
}
