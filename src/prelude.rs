//! Convenience re-exports for common usage.
//!
//! ```
//! use cpamm::prelude::*;
//! ```

pub use crate::config::{InitialMintRule, PoolConfig};
pub use crate::domain::{Address, Amount, Asset, BasisPoints, Shares, SwapQuote, Timestamp};
pub use crate::error::{PoolError, Result};
pub use crate::math::Rounding;
pub use crate::pool::{
    AddLiquidityCall, LiquidityReceipt, Pool, PoolEntry, RemoveLiquidityCall, SwapCall,
    SwapReceipt, WithdrawalReceipt,
};
pub use crate::token::{MemoryToken, TokenContract};
