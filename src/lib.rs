//! # cpamm
//!
//! A constant-product automated market maker pairing a native base
//! currency with one ERC20-style token.
//!
//! Each [`Pool`](pool::Pool) holds two reserves and prices swaps with
//! the `x · y = k` formula after deducting a basis-point fee from the
//! input.  Liquidity providers deposit at the current reserve ratio and
//! receive shares tracking their fraction of the pool; the fee retained
//! from every swap accrues to the reserves, so shares appreciate over
//! time.  Every mutating entry point runs behind a guard layer that
//! enforces deadlines, blocks reentrancy from token callbacks, and rolls
//! back state on any failure.
//!
//! ## Module guide
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`domain`] | Newtypes: amounts, shares, addresses, fees, timestamps |
//! | [`math`] | Checked `mul_div` with explicit rounding, integer square root |
//! | [`error`] | [`PoolError`](error::PoolError) and the crate `Result` alias |
//! | [`config`] | Validated deployment parameters |
//! | [`ledger`] | The two-asset reserve ledger |
//! | [`positions`] | Liquidity-share position book |
//! | [`token`] | The [`TokenContract`](token::TokenContract) seam and in-memory token |
//! | [`pool`] | The pool itself: guard layer, liquidity operations, swaps |
//! | [`prelude`] | One-line import of the common surface |
//!
//! ## Quick start
//!
//! ```
//! use cpamm::prelude::*;
//!
//! # fn main() -> cpamm::error::Result<()> {
//! let config = PoolConfig::new(
//!     Address::from_bytes([0xab; 20]),
//!     BasisPoints::new(30),
//!     InitialMintRule::GeometricMean,
//! )?;
//! let mut pool = Pool::deploy(config)?;
//!
//! let provider = Address::from_bytes([1; 20]);
//! let mut token = MemoryToken::new();
//! token.mint_to(provider, Amount::new(4_000));
//! token.approve(provider, Amount::new(4_000));
//!
//! let now = Timestamp::new(1_700_000_000);
//! let receipt = pool.add_liquidity(
//!     &mut token,
//!     AddLiquidityCall {
//!         caller: provider,
//!         base_deposit: Amount::new(1_000),
//!         token_desired: Amount::new(4_000),
//!         deadline: now.plus(60),
//!     },
//!     now,
//! )?;
//! assert_eq!(receipt.shares_minted(), Shares::new(2_000));
//!
//! let quote = pool.quote(Asset::Base, Amount::new(100))?;
//! let swap = pool.swap(
//!     &mut token,
//!     SwapCall {
//!         caller: provider,
//!         asset_in: Asset::Base,
//!         amount_in: Amount::new(100),
//!         min_amount_out: quote.amount_out(),
//!         deadline: now.plus(60),
//!     },
//!     now,
//! )?;
//! assert_eq!(swap.amount_out(), quote.amount_out());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design notes
//!
//! - All amounts are `u128` newtypes with checked arithmetic; nothing
//!   panics on overflow in release builds.
//! - Rounding always favors the pool: payouts truncate down, required
//!   inputs round up.
//! - The pool never initiates anything.  Each operation is a single
//!   call from the host environment, which supplies the current time
//!   and settles native-currency payouts reported in receipts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod positions;
pub mod prelude;
pub mod token;

#[cfg(test)]
mod proptest_properties;

pub use config::{InitialMintRule, PoolConfig};
pub use error::{PoolError, Result};
pub use pool::Pool;
