//! Unified error type for the pool engine.
//!
//! Every fallible operation across the crate returns [`PoolError`].  All
//! errors are terminal for the attempted operation: the guard layer rolls
//! the entire state mutation back as a unit and the caller is expected to
//! resubmit with adjusted parameters (fresh deadline, relaxed slippage
//! bound) or abandon the call.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, PoolError>;

/// Failure taxonomy for pool operations.
///
/// The variants are deliberately distinct per remediation: a caller
/// reacts to [`PoolError::DeadlineExpired`] (resubmit with a fresh
/// deadline) differently than to [`PoolError::SlippageExceeded`]
/// (relax the bound or reduce size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The caller-supplied deadline lies in the past.
    #[error("deadline expired before the operation executed")]
    DeadlineExpired,

    /// The computed output fell below the caller-supplied minimum.
    #[error("output below the caller-supplied minimum")]
    SlippageExceeded,

    /// The caller's token allowance cannot cover the amount required at
    /// the current reserve ratio.
    #[error("token allowance below the amount required at the current ratio")]
    RatioMismatch,

    /// A debit exceeded the available reserve.
    #[error("debit exceeds the available reserve")]
    InsufficientReserve,

    /// A share burn exceeded the caller's position balance.
    #[error("share burn exceeds the caller's position")]
    InsufficientShares,

    /// A swap was attempted while either reserve is zero.
    #[error("pool has no reserves to trade against")]
    EmptyPool,

    /// Checked arithmetic overflowed; the context names the computation.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A nested call entered the pool while an operation held the lock.
    #[error("reentrant call rejected while an operation is in progress")]
    ReentrancyBlocked,

    /// Input validation failed; the context names the rejected input.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// The token address is malformed (zero address).
    #[error("token address is not well-formed")]
    InvalidAddress,

    /// The token collaborator signalled a failed transfer.
    #[error("token transfer failed: {0}")]
    TransferFailed(&'static str),
}
