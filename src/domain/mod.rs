//! Domain value types for the pool engine.
//!
//! Newtypes with validated constructors and checked arithmetic: raw
//! [`Amount`]s, liquidity [`Shares`], caller/token [`Address`]es, the
//! [`Asset`] side selector, [`BasisPoints`] fee rates, [`Timestamp`]
//! deadlines, and the ephemeral [`SwapQuote`].

mod address;
mod amount;
mod asset;
mod basis_points;
mod quote;
mod shares;
mod timestamp;

pub use address::Address;
pub use amount::Amount;
pub use asset::Asset;
pub use basis_points::BasisPoints;
pub use quote::SwapQuote;
pub use shares::Shares;
pub use timestamp::Timestamp;
