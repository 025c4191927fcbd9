//! Basis-point fee representation.

use core::fmt;

/// Denominator representing 100%.
const BPS_DENOMINATOR: u32 = 10_000;

/// A fee rate in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// A pool fee must stay strictly below 100%: at 10 000 bp the net input
/// of every swap would be zero and the pricing formula degenerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (fee-free pool).
    pub const ZERO: Self = Self(0);

    /// The denominator, 10 000 bp = 100%.
    pub const DENOMINATOR: u32 = BPS_DENOMINATOR;

    /// Creates a `BasisPoints` from a raw `u32`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` if the rate is a usable swap fee (`0..10_000`).
    #[must_use]
    pub const fn is_valid_fee(self) -> bool {
        self.0 < BPS_DENOMINATOR
    }

    /// Returns `10_000 - self`, the retained fraction of a swap input.
    ///
    /// Meaningful only for valid fees; saturates at zero otherwise.
    #[must_use]
    pub const fn complement(self) -> u32 {
        BPS_DENOMINATOR.saturating_sub(self.0)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
