//! Randomized properties of the pool operations.
//!
//! Inputs are bounded well below `u128::MAX` so the properties exercise
//! the pricing and apportionment logic rather than overflow guards; the
//! overflow paths have dedicated unit tests next to the code they guard.

use proptest::prelude::*;

use crate::config::{InitialMintRule, PoolConfig};
use crate::domain::{Address, Amount, Asset, BasisPoints, Shares, Timestamp};
use crate::error::PoolError;
use crate::math::{mul_div, Rounding};
use crate::pool::{AddLiquidityCall, Pool, RemoveLiquidityCall, SwapCall};
use crate::token::MemoryToken;

const NOW: Timestamp = Timestamp::new(1_700_000_000);

fn provider() -> Address {
    Address::from_bytes([1; 20])
}

fn trader() -> Address {
    Address::from_bytes([2; 20])
}

fn seeded(fee_bps: u32, base: u128, token_amount: u128) -> (Pool, MemoryToken) {
    let Ok(config) = PoolConfig::new(
        Address::from_bytes([0xee; 20]),
        BasisPoints::new(fee_bps),
        InitialMintRule::GeometricMean,
    ) else {
        panic!("expected valid config");
    };
    let Ok(mut pool) = Pool::deploy(config) else {
        panic!("expected deployable pool");
    };
    let mut token = MemoryToken::new();
    token.mint_to(provider(), Amount::new(token_amount));
    token.approve(provider(), Amount::new(token_amount));
    let call = AddLiquidityCall {
        caller: provider(),
        base_deposit: Amount::new(base),
        token_desired: Amount::new(token_amount),
        deadline: NOW.plus(60),
    };
    let Ok(_) = pool.add_liquidity(&mut token, call, NOW) else {
        panic!("expected successful seed deposit");
    };
    (pool, token)
}

proptest! {
    /// A swap either executes and leaves the reserve product at or above
    /// its pre-trade value, or rejects dust input and leaves the
    /// reserves untouched.
    #[test]
    fn swap_never_decreases_reserve_product(
        base in 1u128..1_000_000_000,
        token_amount in 1u128..1_000_000_000,
        fee_bps in 0u32..1_000,
        amount_in in 1u128..1_000_000_000,
        base_in in proptest::bool::ANY,
    ) {
        let (mut pool, mut token) = seeded(fee_bps, base, token_amount);
        token.mint_to(trader(), Amount::new(amount_in));
        token.approve(trader(), Amount::new(amount_in));
        let product_before = pool.reserve_base().get() * pool.reserve_token().get();

        let call = SwapCall {
            caller: trader(),
            asset_in: if base_in { Asset::Base } else { Asset::Token },
            amount_in: Amount::new(amount_in),
            min_amount_out: Amount::ZERO,
            deadline: NOW.plus(60),
        };
        match pool.swap(&mut token, call, NOW) {
            Ok(receipt) => {
                let product_after =
                    pool.reserve_base().get() * pool.reserve_token().get();
                let reserve_out_before = if base_in { token_amount } else { base };
                prop_assert!(product_after >= product_before);
                prop_assert!(receipt.amount_out().get() < reserve_out_before);
            }
            Err(PoolError::InvalidAmount(_)) => {
                prop_assert_eq!(pool.reserve_base().get(), base);
                prop_assert_eq!(pool.reserve_token().get(), token_amount);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Shares minted against a deposit track the deposit's fraction of
    /// the post-deposit reserves to within one truncation unit.
    #[test]
    fn minted_shares_track_deposit_fraction(
        base in 100u128..1_000_000_000,
        token_amount in 100u128..1_000_000_000,
        deposit_base in 1u128..1_000_000,
    ) {
        let (mut pool, mut token) = seeded(30, base, token_amount);
        token.mint_to(trader(), Amount::MAX);
        token.approve(trader(), Amount::MAX);

        let call = AddLiquidityCall {
            caller: trader(),
            base_deposit: Amount::new(deposit_base),
            token_desired: Amount::MAX,
            deadline: NOW.plus(60),
        };
        let receipt = match pool.add_liquidity(&mut token, call, NOW) {
            Ok(receipt) => receipt,
            // Dust deposits that round to zero shares are rejected whole.
            Err(PoolError::InvalidAmount(_)) => return Ok(()),
            Err(other) => panic!("unexpected error: {other}"),
        };

        let minted = receipt.shares_minted().get();
        let expected = mul_div(
            receipt.base_deposited().get(),
            pool.total_shares().get(),
            pool.reserve_base().get(),
            Rounding::Down,
        );
        let Some(expected) = expected else {
            panic!("proportionality check overflowed");
        };
        prop_assert!(
            expected.abs_diff(minted) <= 1,
            "minted={} expected={}",
            minted,
            expected
        );
    }

    /// Withdrawing the entire share supply returns exactly the reserves
    /// and leaves the pool empty.
    #[test]
    fn full_withdrawal_drains_pool_exactly(
        base in 1u128..1_000_000_000,
        token_amount in 1u128..1_000_000_000,
    ) {
        let (mut pool, mut token) = seeded(30, base, token_amount);
        let call = RemoveLiquidityCall {
            caller: provider(),
            shares: pool.total_shares(),
            min_base_out: Amount::ZERO,
            min_token_out: Amount::ZERO,
            deadline: NOW.plus(60),
        };
        let Ok(receipt) = pool.remove_liquidity(&mut token, call, NOW) else {
            panic!("expected successful withdrawal");
        };
        prop_assert_eq!(receipt.base_out().get(), base);
        prop_assert_eq!(receipt.token_out().get(), token_amount);
        prop_assert!(pool.is_empty());
        prop_assert_eq!(pool.k_min(), 0);
    }

    /// Splitting a withdrawal into two burns pays out the reserves in
    /// full with nothing left over.
    #[test]
    fn split_withdrawal_conserves_value(
        base in 2u128..1_000_000_000,
        token_amount in 2u128..1_000_000_000,
        split_ppm in 1u32..1_000_000,
    ) {
        let (mut pool, mut token) = seeded(30, base, token_amount);
        let total = pool.total_shares().get();
        let first = (total * u128::from(split_ppm) / 1_000_000).max(1);
        prop_assume!(first < total);

        let call = RemoveLiquidityCall {
            caller: provider(),
            shares: Shares::new(first),
            min_base_out: Amount::ZERO,
            min_token_out: Amount::ZERO,
            deadline: NOW.plus(60),
        };
        let Ok(first_receipt) = pool.remove_liquidity(&mut token, call, NOW) else {
            panic!("expected successful first withdrawal");
        };
        let call = RemoveLiquidityCall {
            caller: provider(),
            shares: Shares::new(total - first),
            min_base_out: Amount::ZERO,
            min_token_out: Amount::ZERO,
            deadline: NOW.plus(60),
        };
        let Ok(second_receipt) = pool.remove_liquidity(&mut token, call, NOW) else {
            panic!("expected successful second withdrawal");
        };

        let base_total = first_receipt.base_out().get() + second_receipt.base_out().get();
        let token_total =
            first_receipt.token_out().get() + second_receipt.token_out().get();
        prop_assert_eq!(base_total, base);
        prop_assert_eq!(token_total, token_amount);
        prop_assert!(pool.is_empty());
    }

    /// A later provider who deposits and immediately withdraws can never
    /// extract more than they put in; truncation losses stay in the pool.
    #[test]
    fn deposit_withdraw_round_trip_never_profits(
        base in 100u128..1_000_000_000,
        token_amount in 100u128..1_000_000_000,
        deposit_base in 1u128..1_000_000,
    ) {
        let (mut pool, mut token) = seeded(30, base, token_amount);
        token.mint_to(trader(), Amount::MAX);
        token.approve(trader(), Amount::MAX);

        let add = AddLiquidityCall {
            caller: trader(),
            base_deposit: Amount::new(deposit_base),
            token_desired: Amount::MAX,
            deadline: NOW.plus(60),
        };
        let receipt = match pool.add_liquidity(&mut token, add, NOW) {
            Ok(receipt) => receipt,
            // Dust deposits that round to zero shares are rejected whole.
            Err(PoolError::InvalidAmount(_)) => return Ok(()),
            Err(other) => panic!("unexpected error: {other}"),
        };

        let remove = RemoveLiquidityCall {
            caller: trader(),
            shares: receipt.shares_minted(),
            min_base_out: Amount::ZERO,
            min_token_out: Amount::ZERO,
            deadline: NOW.plus(60),
        };
        let Ok(out) = pool.remove_liquidity(&mut token, remove, NOW) else {
            panic!("expected successful withdrawal");
        };
        prop_assert!(out.base_out() <= receipt.base_deposited());
        prop_assert!(out.token_out() <= receipt.token_deposited());
    }
}
