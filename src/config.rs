//! Pool deployment configuration.

use crate::domain::{Address, BasisPoints};
use crate::error::{PoolError, Result};

/// Rule for minting shares into an empty pool.
///
/// The first depositor sets the initial price ratio, so the share count
/// minted against that deposit is a policy choice rather than a derived
/// quantity.  Configurable pending confirmation from the deployed
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialMintRule {
    /// Shares = `isqrt(base_deposit * token_deposit)`.
    ///
    /// The geometric mean makes the initial share count independent of
    /// how the depositor splits value across the two sides, so no value
    /// is donated to (or extracted by) the first depositor.
    #[default]
    GeometricMean,
    /// Shares = the base-currency deposit, taken at face value.
    BaseDeposit,
}

/// Immutable parameters of one pool deployment.
///
/// Binds the pool to a single ERC20-style token address and fixes the
/// swap fee and initial-mint rule for the pool's lifetime.
///
/// # Validation
///
/// - The token address must be well-formed (non-zero).
/// - The fee must be strictly below 100% (10 000 bp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    token: Address,
    fee_bps: BasisPoints,
    initial_mint: InitialMintRule,
}

impl PoolConfig {
    /// Creates a validated `PoolConfig`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidAddress`] if `token` is the zero address.
    /// - [`PoolError::InvalidAmount`] if `fee_bps` is 100% or more.
    pub fn new(
        token: Address,
        fee_bps: BasisPoints,
        initial_mint: InitialMintRule,
    ) -> Result<Self> {
        let config = Self {
            token,
            fee_bps,
            initial_mint,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`PoolConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if self.token.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        if !self.fee_bps.is_valid_fee() {
            return Err(PoolError::InvalidAmount("fee must be below 10000 bp"));
        }
        Ok(())
    }

    /// Returns the bound token address.
    #[must_use]
    pub const fn token(&self) -> Address {
        self.token
    }

    /// Returns the swap fee in basis points.
    #[must_use]
    pub const fn fee_bps(&self) -> BasisPoints {
        self.fee_bps
    }

    /// Returns the initial-mint rule.
    #[must_use]
    pub const fn initial_mint(&self) -> InitialMintRule {
        self.initial_mint
    }
}
