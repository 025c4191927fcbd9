//! The constant-product pool: guard layer and state machine.
//!
//! # Swap algorithm (input side → output side)
//!
//! 1. `net_in = amount_in × (10 000 − fee_bps) / 10 000` (truncated)
//! 2. `amount_out = reserve_out × net_in / (reserve_in + net_in)` (truncated)
//! 3. `reserve_in += amount_in` (the fee stays in the pool)
//! 4. `reserve_out -= amount_out`
//!
//! Truncation always rounds in the pool's favor: down for amounts paid
//! out, up for amounts required in.  After every swap
//! `reserve_base × reserve_token` is at least its value after the most
//! recent liquidity change, and strictly greater when the fee is
//! non-zero — that retained fee funds liquidity-provider yield.
//!
//! # Guard layer
//!
//! Every mutating entry point runs, in order: deadline check, reentrancy
//! lock, input validation.  The lock is held across all external token
//! calls; a nested entry attempt through the [`PoolEntry`] context a
//! token receives fails with `ReentrancyBlocked`.  On any failure after
//! the lock is taken, the pre-operation snapshot of ledger, position
//! book, and invariant floor is restored, so no partial update is ever
//! observable.

use tracing::info;

use crate::config::{InitialMintRule, PoolConfig};
use crate::domain::{Address, Amount, Asset, BasisPoints, Shares, SwapQuote, Timestamp};
use crate::error::{PoolError, Result};
use crate::ledger::ReserveLedger;
use crate::math::{isqrt, Rounding};
use crate::positions::PositionBook;
use crate::token::TokenContract;

/// Parameters of an `addLiquidity` call.
///
/// `base_deposit` is the attached native-currency value; `token_desired`
/// is the caller's token offer, pulled in full on the first deposit and
/// treated as an upper bound afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLiquidityCall {
    /// The depositing provider.
    pub caller: Address,
    /// Attached base-currency value.
    pub base_deposit: Amount,
    /// Token amount offered (approved beforehand).
    pub token_desired: Amount,
    /// Expiry; the call fails once the current time passes it.
    pub deadline: Timestamp,
}

/// Parameters of a `removeLiquidity` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveLiquidityCall {
    /// The withdrawing provider.
    pub caller: Address,
    /// Shares to burn.
    pub shares: Shares,
    /// Minimum acceptable base-currency payout.
    pub min_base_out: Amount,
    /// Minimum acceptable token payout.
    pub min_token_out: Amount,
    /// Expiry; the call fails once the current time passes it.
    pub deadline: Timestamp,
}

/// Parameters of a `swap` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapCall {
    /// The trading caller.
    pub caller: Address,
    /// Which side is being sold to the pool.
    pub asset_in: Asset,
    /// Input amount (attached value for base, pulled for token).
    pub amount_in: Amount,
    /// Slippage bound: minimum acceptable output.
    pub min_amount_out: Amount,
    /// Expiry; the call fails once the current time passes it.
    pub deadline: Timestamp,
}

/// Outcome of a successful `addLiquidity` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityReceipt {
    shares_minted: Shares,
    base_deposited: Amount,
    token_deposited: Amount,
    base_refunded: Amount,
}

impl LiquidityReceipt {
    /// Returns the shares minted to the caller.
    pub const fn shares_minted(&self) -> Shares {
        self.shares_minted
    }

    /// Returns the base-currency amount actually kept by the pool.
    pub const fn base_deposited(&self) -> Amount {
        self.base_deposited
    }

    /// Returns the token amount pulled from the caller.
    pub const fn token_deposited(&self) -> Amount {
        self.token_deposited
    }

    /// Returns the attached base currency owed back to the caller.
    pub const fn base_refunded(&self) -> Amount {
        self.base_refunded
    }
}

/// Outcome of a successful `removeLiquidity` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    shares_burned: Shares,
    base_out: Amount,
    token_out: Amount,
}

impl WithdrawalReceipt {
    /// Returns the shares burned.
    pub const fn shares_burned(&self) -> Shares {
        self.shares_burned
    }

    /// Returns the base currency owed to the caller.
    pub const fn base_out(&self) -> Amount {
        self.base_out
    }

    /// Returns the token amount transferred to the caller.
    pub const fn token_out(&self) -> Amount {
        self.token_out
    }
}

/// Outcome of a successful `swap` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapReceipt {
    asset_in: Asset,
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
}

impl SwapReceipt {
    /// Returns the side that was sold to the pool.
    pub const fn asset_in(&self) -> Asset {
        self.asset_in
    }

    /// Returns the input amount, fee included.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the output amount.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns the fee retained by the pool, in input-side units.
    pub const fn fee(&self) -> Amount {
        self.fee
    }
}

/// The pool's mutating entry points, as visible to an external callee.
///
/// The pool hands `&mut dyn PoolEntry` to every outbound token call, so
/// a token implementation *can* attempt to re-enter mid-transfer — and
/// the guard layer rejects the attempt with
/// [`PoolError::ReentrancyBlocked`] while an operation is in progress.
pub trait PoolEntry {
    /// See [`Pool::add_liquidity`].
    fn add_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: AddLiquidityCall,
        now: Timestamp,
    ) -> Result<LiquidityReceipt>;

    /// See [`Pool::remove_liquidity`].
    fn remove_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: RemoveLiquidityCall,
        now: Timestamp,
    ) -> Result<WithdrawalReceipt>;

    /// See [`Pool::swap`].
    fn swap(
        &mut self,
        token: &mut dyn TokenContract,
        call: SwapCall,
        now: Timestamp,
    ) -> Result<SwapReceipt>;
}

/// A constant-product pool pairing the native base currency with one
/// ERC20-style token.
///
/// One instance per deployment; every entry point takes the pool by
/// exclusive reference, so multiple pools coexist without shared state.
/// The host environment serializes calls — the only concurrency hazard
/// left is a nested call from a token callback, handled by the guard
/// layer.
#[derive(Debug)]
pub struct Pool {
    config: PoolConfig,
    ledger: ReserveLedger,
    book: PositionBook,
    /// Reserve product immediately after the most recent
    /// liquidity-changing operation; swaps may only grow it.
    k_min: u128,
    locked: bool,
}

impl Pool {
    /// Deploys a pool bound to the configured token address.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolConfig::validate`] failures
    /// ([`PoolError::InvalidAddress`], [`PoolError::InvalidAmount`]).
    pub fn deploy(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        info!(token = %config.token(), fee = %config.fee_bps(), "pool deployed");
        Ok(Self {
            config,
            ledger: ReserveLedger::empty(),
            book: PositionBook::new(),
            k_min: 0,
            locked: false,
        })
    }

    /// Returns the base-currency reserve.
    #[must_use]
    pub const fn reserve_base(&self) -> Amount {
        self.ledger.base()
    }

    /// Returns the token reserve.
    #[must_use]
    pub const fn reserve_token(&self) -> Amount {
        self.ledger.token()
    }

    /// Returns the outstanding share supply.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.book.total()
    }

    /// Returns the share balance of `owner`.
    #[must_use]
    pub fn shares_of(&self, owner: Address) -> Shares {
        self.book.shares_of(owner)
    }

    /// Returns the deployment configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the invariant floor: the reserve product recorded after
    /// the most recent liquidity change.
    #[must_use]
    pub const fn k_min(&self) -> u128 {
        self.k_min
    }

    /// Returns `true` if the pool holds no liquidity.
    ///
    /// By construction this is equivalent to both reserves being zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.book.total().is_zero()
    }

    /// Adds liquidity against an attached base-currency value.
    ///
    /// On the first deposit the caller sets the price ratio and both
    /// amounts are taken in full, with shares minted by the configured
    /// [`InitialMintRule`].  On a non-empty pool the token requirement is
    /// computed from the attached base at the current ratio, capped by
    /// `token_desired` (excess base is refunded in that case), and shares
    /// are minted on the smaller contribution ratio.
    ///
    /// # Errors
    ///
    /// - [`PoolError::DeadlineExpired`] if `now` is past the deadline.
    /// - [`PoolError::ReentrancyBlocked`] on nested entry.
    /// - [`PoolError::InvalidAmount`] for zero or dust-level deposits.
    /// - [`PoolError::RatioMismatch`] if the token allowance cannot cover
    ///   the amount to pull.
    /// - [`PoolError::TransferFailed`] if the token pull fails.
    /// - [`PoolError::Overflow`] on arithmetic overflow.
    pub fn add_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: AddLiquidityCall,
        now: Timestamp,
    ) -> Result<LiquidityReceipt> {
        self.guarded(call.deadline, now, |pool| {
            pool.add_liquidity_locked(token, &call)
        })
    }

    /// Burns `shares` and pays out the proportional slice of both
    /// reserves, rounding payouts down.
    ///
    /// The token side is transferred immediately; the base side is owed
    /// to the caller and reported in the receipt for the host to settle.
    ///
    /// # Errors
    ///
    /// - [`PoolError::DeadlineExpired`] / [`PoolError::ReentrancyBlocked`]
    ///   from the guard layer.
    /// - [`PoolError::InsufficientShares`] if the caller's position
    ///   cannot cover the burn.
    /// - [`PoolError::SlippageExceeded`] if either payout falls below the
    ///   caller's minimum.
    pub fn remove_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: RemoveLiquidityCall,
        now: Timestamp,
    ) -> Result<WithdrawalReceipt> {
        self.guarded(call.deadline, now, |pool| {
            pool.remove_liquidity_locked(token, &call)
        })
    }

    /// Executes a single-hop swap against the reserves.
    ///
    /// # Errors
    ///
    /// - [`PoolError::DeadlineExpired`] / [`PoolError::ReentrancyBlocked`]
    ///   from the guard layer.
    /// - [`PoolError::EmptyPool`] if either reserve is zero.
    /// - [`PoolError::InvalidAmount`] for a zero or dust-level input.
    /// - [`PoolError::SlippageExceeded`] if the output falls below
    ///   `min_amount_out`.
    /// - [`PoolError::TransferFailed`] if a token transfer fails.
    /// - [`PoolError::Overflow`] on arithmetic overflow.
    pub fn swap(
        &mut self,
        token: &mut dyn TokenContract,
        call: SwapCall,
        now: Timestamp,
    ) -> Result<SwapReceipt> {
        self.guarded(call.deadline, now, |pool| pool.swap_locked(token, &call))
    }

    /// Previews a swap without touching state.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::swap`] minus the guard and transfer failures.
    pub fn quote(&self, asset_in: Asset, amount_in: Amount) -> Result<SwapQuote> {
        let (reserve_in, reserve_out) = self.oriented_reserves(asset_in)?;
        let (amount_out, _fee) = self.swap_output(amount_in, reserve_in, reserve_out)?;

        let spot = reserve_out.get() as f64 / reserve_in.get() as f64;
        let effective = amount_out.get() as f64 / amount_in.get() as f64;
        let price_impact = ((spot - effective) / spot * 100.0).max(0.0);

        Ok(SwapQuote::new(asset_in, amount_in, amount_out, price_impact))
    }

    // -- guard layer ---------------------------------------------------------

    /// Runs `op` under the operation lock with all-or-nothing semantics.
    ///
    /// Order is fixed: deadline first, then the reentrancy lock.  A
    /// snapshot of ledger, book, and invariant floor is restored on any
    /// error so no partial mutation survives.
    fn guarded<T>(
        &mut self,
        deadline: Timestamp,
        now: Timestamp,
        op: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if now > deadline {
            return Err(PoolError::DeadlineExpired);
        }
        if self.locked {
            return Err(PoolError::ReentrancyBlocked);
        }
        self.locked = true;
        let snapshot = (self.ledger.clone(), self.book.clone(), self.k_min);
        let outcome = op(self);
        if outcome.is_err() {
            let (ledger, book, k_min) = snapshot;
            self.ledger = ledger;
            self.book = book;
            self.k_min = k_min;
        }
        self.locked = false;
        outcome
    }

    // -- liquidity -----------------------------------------------------------

    fn add_liquidity_locked(
        &mut self,
        token: &mut dyn TokenContract,
        call: &AddLiquidityCall,
    ) -> Result<LiquidityReceipt> {
        if call.base_deposit.is_zero() {
            return Err(PoolError::InvalidAmount("base deposit must be non-zero"));
        }
        if call.token_desired.is_zero() {
            return Err(PoolError::InvalidAmount("token offer must be non-zero"));
        }

        let (base_in, token_in, refund, minted) = if self.book.total().is_zero() {
            let minted = self.initial_shares(call.base_deposit, call.token_desired)?;
            (call.base_deposit, call.token_desired, Amount::ZERO, minted)
        } else {
            self.proportional_deposit(call.base_deposit, call.token_desired)?
        };

        if token.allowance(call.caller) < token_in {
            return Err(PoolError::RatioMismatch);
        }
        token.transfer_from(self, call.caller, token_in)?;

        self.ledger.credit(Asset::Base, base_in)?;
        self.ledger.credit(Asset::Token, token_in)?;
        self.book.mint(call.caller, minted)?;
        self.k_min = self.ledger.current_product()?;

        info!(
            caller = %call.caller,
            base = %base_in,
            token = %token_in,
            refund = %refund,
            minted = %minted,
            "liquidity added"
        );
        Ok(LiquidityReceipt {
            shares_minted: minted,
            base_deposited: base_in,
            token_deposited: token_in,
            base_refunded: refund,
        })
    }

    /// Shares for the pool-seeding deposit, per the configured rule.
    fn initial_shares(&self, base: Amount, token: Amount) -> Result<Shares> {
        let minted = match self.config.initial_mint() {
            InitialMintRule::GeometricMean => {
                let product = base
                    .get()
                    .checked_mul(token.get())
                    .ok_or(PoolError::Overflow("initial deposit product"))?;
                isqrt(product)
            }
            InitialMintRule::BaseDeposit => base.get(),
        };
        if minted == 0 {
            return Err(PoolError::InvalidAmount("deposit too small to mint shares"));
        }
        Ok(Shares::new(minted))
    }

    /// Computes `(base_in, token_in, base_refund, shares)` for a deposit
    /// into a non-empty pool.
    ///
    /// The token requirement follows from the attached base at the
    /// current ratio, rounded up.  When the caller's token offer caps the
    /// deposit instead, the base side is scaled down and the remainder
    /// refunded.
    fn proportional_deposit(
        &self,
        base_deposit: Amount,
        token_desired: Amount,
    ) -> Result<(Amount, Amount, Amount, Shares)> {
        let reserve_base = self.ledger.base();
        let reserve_token = self.ledger.token();

        let token_required = base_deposit
            .mul_div(reserve_token, reserve_base, Rounding::Up)
            .ok_or(PoolError::Overflow("required token amount"))?;

        let (base_in, token_in, refund) = if token_required <= token_desired {
            (base_deposit, token_required, Amount::ZERO)
        } else {
            let base_needed = token_desired
                .mul_div(reserve_base, reserve_token, Rounding::Up)
                .ok_or(PoolError::Overflow("required base amount"))?
                .min(base_deposit);
            let refund = base_deposit
                .checked_sub(base_needed)
                .ok_or(PoolError::Overflow("base refund"))?;
            (base_needed, token_desired, refund)
        };

        let total = self.book.total().as_amount();
        let by_base = base_in
            .mul_div(total, reserve_base, Rounding::Down)
            .ok_or(PoolError::Overflow("share quote from base"))?;
        let by_token = token_in
            .mul_div(total, reserve_token, Rounding::Down)
            .ok_or(PoolError::Overflow("share quote from token"))?;
        let minted = by_base.min(by_token);
        if minted.is_zero() {
            return Err(PoolError::InvalidAmount("deposit too small to mint shares"));
        }

        Ok((base_in, token_in, refund, Shares::new(minted.get())))
    }

    fn remove_liquidity_locked(
        &mut self,
        token: &mut dyn TokenContract,
        call: &RemoveLiquidityCall,
    ) -> Result<WithdrawalReceipt> {
        if call.shares.is_zero() {
            return Err(PoolError::InvalidAmount("share burn must be non-zero"));
        }
        if self.book.shares_of(call.caller) < call.shares {
            return Err(PoolError::InsufficientShares);
        }

        let total = self.book.total().as_amount();
        let burn = call.shares.as_amount();
        let base_out = self
            .ledger
            .base()
            .mul_div(burn, total, Rounding::Down)
            .ok_or(PoolError::Overflow("base withdrawal"))?;
        let token_out = self
            .ledger
            .token()
            .mul_div(burn, total, Rounding::Down)
            .ok_or(PoolError::Overflow("token withdrawal"))?;

        if base_out < call.min_base_out || token_out < call.min_token_out {
            return Err(PoolError::SlippageExceeded);
        }

        self.book.burn(call.caller, call.shares)?;
        self.ledger.debit(Asset::Base, base_out)?;
        self.ledger.debit(Asset::Token, token_out)?;
        self.k_min = self.ledger.current_product()?;

        token.transfer(self, call.caller, token_out)?;

        info!(
            caller = %call.caller,
            burned = %call.shares,
            base_out = %base_out,
            token_out = %token_out,
            "liquidity removed"
        );
        Ok(WithdrawalReceipt {
            shares_burned: call.shares,
            base_out,
            token_out,
        })
    }

    // -- swaps ---------------------------------------------------------------

    fn swap_locked(
        &mut self,
        token: &mut dyn TokenContract,
        call: &SwapCall,
    ) -> Result<SwapReceipt> {
        let (reserve_in, reserve_out) = self.oriented_reserves(call.asset_in)?;
        let (amount_out, fee) = self.swap_output(call.amount_in, reserve_in, reserve_out)?;

        if amount_out < call.min_amount_out {
            return Err(PoolError::SlippageExceeded);
        }

        if call.asset_in == Asset::Token {
            token.transfer_from(self, call.caller, call.amount_in)?;
        }

        self.ledger.credit(call.asset_in, call.amount_in)?;
        self.ledger.debit(call.asset_in.other(), amount_out)?;
        let product = self.ledger.current_product()?;
        debug_assert!(product >= self.k_min, "constant-product invariant violated");

        if call.asset_in == Asset::Base {
            token.transfer(self, call.caller, amount_out)?;
        }

        info!(
            caller = %call.caller,
            asset_in = %call.asset_in,
            amount_in = %call.amount_in,
            amount_out = %amount_out,
            fee = %fee,
            "swap executed"
        );
        Ok(SwapReceipt {
            asset_in: call.asset_in,
            amount_in: call.amount_in,
            amount_out,
            fee,
        })
    }

    /// Returns `(reserve_in, reserve_out)` for the given input side.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyPool`] if either reserve is zero.
    fn oriented_reserves(&self, asset_in: Asset) -> Result<(Amount, Amount)> {
        if self.ledger.is_depleted() {
            return Err(PoolError::EmptyPool);
        }
        Ok((
            self.ledger.reserve(asset_in),
            self.ledger.reserve(asset_in.other()),
        ))
    }

    /// Applies the post-fee constant-product formula.  Returns
    /// `(amount_out, fee)`; both roundings favor the pool.
    fn swap_output(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<(Amount, Amount)> {
        if amount_in.is_zero() {
            return Err(PoolError::InvalidAmount("swap input must be non-zero"));
        }

        let retained = u128::from(self.config.fee_bps().complement());
        let net_in = amount_in
            .mul_div(
                Amount::new(retained),
                Amount::new(u128::from(BasisPoints::DENOMINATOR)),
                Rounding::Down,
            )
            .ok_or(PoolError::Overflow("net swap input"))?;
        if net_in.is_zero() {
            return Err(PoolError::InvalidAmount("swap input too small after fee"));
        }
        // fee = amount_in - net_in; cannot underflow since net_in <= amount_in.
        let fee = amount_in
            .checked_sub(net_in)
            .ok_or(PoolError::Overflow("swap fee"))?;

        let denominator = reserve_in
            .checked_add(net_in)
            .ok_or(PoolError::Overflow("swap denominator"))?;
        let amount_out = reserve_out
            .mul_div(net_in, denominator, Rounding::Down)
            .ok_or(PoolError::Overflow("swap output"))?;
        if amount_out.is_zero() {
            return Err(PoolError::InvalidAmount(
                "swap input too small for a non-zero output",
            ));
        }

        Ok((amount_out, fee))
    }
}

impl PoolEntry for Pool {
    fn add_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: AddLiquidityCall,
        now: Timestamp,
    ) -> Result<LiquidityReceipt> {
        Pool::add_liquidity(self, token, call, now)
    }

    fn remove_liquidity(
        &mut self,
        token: &mut dyn TokenContract,
        call: RemoveLiquidityCall,
        now: Timestamp,
    ) -> Result<WithdrawalReceipt> {
        Pool::remove_liquidity(self, token, call, now)
    }

    fn swap(
        &mut self,
        token: &mut dyn TokenContract,
        call: SwapCall,
        now: Timestamp,
    ) -> Result<SwapReceipt> {
        Pool::swap(self, token, call, now)
    }
}
