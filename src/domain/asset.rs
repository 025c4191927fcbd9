//! Pool asset selector.

use core::fmt;

/// Selects one side of the pool's two-asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Asset {
    /// The native base currency held custodially by the pool.
    Base,
    /// The ERC20-style token bound at deployment.
    Token,
}

impl Asset {
    /// Returns the counterpart side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Base => Self::Token,
            Self::Token => Self::Base,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Token => write!(f, "token"),
        }
    }
}
