//! Second-resolution timestamps for deadline checks.

use core::fmt;

/// Seconds since the Unix epoch, as supplied by the host environment.
///
/// The pool never reads a clock itself: every mutating entry point takes
/// the current time from the caller, which keeps multiple pools and
/// arbitrary time travel trivially testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a `Timestamp` from seconds since the epoch.
    #[must_use]
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the underlying second count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns this timestamp advanced by `seconds`, saturating at the
    /// maximum representable instant.
    #[must_use]
    pub const fn plus(self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
