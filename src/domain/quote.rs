//! Ephemeral swap quote.

use core::fmt;

use super::{Amount, Asset};

/// A computed, never persisted, preview of a swap.
///
/// `price_impact` is the percentage by which the realized price falls
/// short of the pre-trade spot price; it grows with trade size relative
/// to the reserves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapQuote {
    asset_in: Asset,
    amount_in: Amount,
    amount_out: Amount,
    price_impact: f64,
}

impl SwapQuote {
    pub(crate) const fn new(
        asset_in: Asset,
        amount_in: Amount,
        amount_out: Amount,
        price_impact: f64,
    ) -> Self {
        Self {
            asset_in,
            amount_in,
            amount_out,
            price_impact,
        }
    }

    /// Returns the input side of the quoted swap.
    #[must_use]
    pub const fn asset_in(&self) -> Asset {
        self.asset_in
    }

    /// Returns the quoted input amount.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the quoted output amount.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns the price impact as a percentage in `0.0..=100.0`.
    #[must_use]
    pub const fn price_impact(&self) -> f64 {
        self.price_impact
    }
}

impl fmt::Display for SwapQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapQuote(in={} {}, out={}, impact={:.4}%)",
            self.amount_in, self.asset_in, self.amount_out, self.price_impact
        )
    }
}
