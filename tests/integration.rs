//! End-to-end scenarios driving the pool through full lifecycles.

use cpamm::prelude::*;

const NOW: Timestamp = Timestamp::new(1_700_000_000);

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn deadline() -> Timestamp {
    NOW.plus(300)
}

fn deploy_pool(fee_bps: u32) -> Pool {
    let Ok(config) = PoolConfig::new(
        addr(0xcc),
        BasisPoints::new(fee_bps),
        InitialMintRule::GeometricMean,
    ) else {
        panic!("expected valid config");
    };
    let Ok(pool) = Pool::deploy(config) else {
        panic!("expected deployable pool");
    };
    pool
}

fn fund(token: &mut MemoryToken, owner: Address, amount: u128) {
    token.mint_to(owner, Amount::new(amount));
    token.approve(owner, Amount::new(amount));
}

fn add_liquidity(
    pool: &mut Pool,
    token: &mut MemoryToken,
    caller: Address,
    base: u128,
    token_amount: u128,
) -> LiquidityReceipt {
    let call = AddLiquidityCall {
        caller,
        base_deposit: Amount::new(base),
        token_desired: Amount::new(token_amount),
        deadline: deadline(),
    };
    let Ok(receipt) = pool.add_liquidity(token, call, NOW) else {
        panic!("expected successful add_liquidity");
    };
    receipt
}

fn swap(
    pool: &mut Pool,
    token: &mut MemoryToken,
    caller: Address,
    asset_in: Asset,
    amount_in: u128,
) -> SwapReceipt {
    let call = SwapCall {
        caller,
        asset_in,
        amount_in: Amount::new(amount_in),
        min_amount_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(receipt) = pool.swap(token, call, NOW) else {
        panic!("expected successful swap");
    };
    receipt
}

#[test]
fn full_pool_lifecycle() {
    let alice = addr(1);
    let bob = addr(2);
    let carol = addr(3);

    let mut pool = deploy_pool(30);
    let mut token = MemoryToken::new();
    fund(&mut token, alice, 400_000);
    fund(&mut token, bob, 40_000);
    fund(&mut token, carol, 50_000);

    // Alice seeds the pool at 1 base : 4 token.
    let seed = add_liquidity(&mut pool, &mut token, alice, 100_000, 400_000);
    assert_eq!(seed.shares_minted(), Shares::new(200_000));
    assert_eq!(pool.k_min(), 40_000_000_000);

    // Bob joins at the current ratio and gets a proportional position.
    let joined = add_liquidity(&mut pool, &mut token, bob, 10_000, 40_000);
    assert_eq!(joined.shares_minted(), Shares::new(20_000));
    assert_eq!(pool.total_shares(), Shares::new(220_000));
    assert_eq!(pool.reserve_base(), Amount::new(110_000));
    assert_eq!(pool.reserve_token(), Amount::new(440_000));

    // Carol trades both directions; each swap leaves a fee behind.
    let k_before_trading = pool.k_min();
    let bought = swap(&mut pool, &mut token, carol, Asset::Base, 5_000);
    assert!(bought.amount_out() > Amount::ZERO);
    assert!(bought.fee() > Amount::ZERO);
    let sold = swap(
        &mut pool,
        &mut token,
        carol,
        Asset::Token,
        bought.amount_out().get(),
    );
    assert!(sold.amount_out() < Amount::new(5_000));

    let product = pool.reserve_base().get() * pool.reserve_token().get();
    assert!(product > k_before_trading, "fees must grow the product");

    // Bob exits fully, collecting his slice of the grown reserves.
    let bob_shares = pool.shares_of(bob);
    let call = RemoveLiquidityCall {
        caller: bob,
        shares: bob_shares,
        min_base_out: Amount::ZERO,
        min_token_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(bob_exit) = pool.remove_liquidity(&mut token, call, NOW) else {
        panic!("expected successful remove_liquidity");
    };
    assert_eq!(pool.shares_of(bob), Shares::new(0));
    assert!(bob_exit.base_out() > Amount::ZERO);
    assert!(bob_exit.token_out() > Amount::ZERO);

    // Alice drains the rest; the pool returns to its deployed state.
    let call = RemoveLiquidityCall {
        caller: alice,
        shares: pool.shares_of(alice),
        min_base_out: Amount::ZERO,
        min_token_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(_) = pool.remove_liquidity(&mut token, call, NOW) else {
        panic!("expected successful remove_liquidity");
    };
    assert!(pool.is_empty());
    assert_eq!(pool.reserve_base(), Amount::ZERO);
    assert_eq!(pool.reserve_token(), Amount::ZERO);
    assert_eq!(token.pool_balance(), Amount::ZERO);
}

#[test]
fn fees_accrue_to_liquidity_providers() {
    let alice = addr(1);
    let carol = addr(3);

    let mut pool = deploy_pool(100);
    let mut token = MemoryToken::new();
    fund(&mut token, alice, 1_000_000);
    fund(&mut token, carol, 10_000_000);

    add_liquidity(&mut pool, &mut token, alice, 1_000_000, 1_000_000);

    // Round-trip trading leaves 1% of every input in the pool.
    for _ in 0..50 {
        let bought = swap(&mut pool, &mut token, carol, Asset::Token, 10_000);
        swap(&mut pool, &mut token, carol, Asset::Base, bought.amount_out().get());
    }

    let call = RemoveLiquidityCall {
        caller: alice,
        shares: pool.shares_of(alice),
        min_base_out: Amount::ZERO,
        min_token_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(exit) = pool.remove_liquidity(&mut token, call, NOW) else {
        panic!("expected successful remove_liquidity");
    };
    // Carol only ever sold token round-trips, so the token side must have
    // grown past the original deposit.
    assert!(exit.token_out() > Amount::new(1_000_000));
}

#[test]
fn identical_call_sequences_produce_identical_state() {
    let run = || {
        let mut pool = deploy_pool(30);
        let mut token = MemoryToken::new();
        fund(&mut token, addr(1), 500_000);
        fund(&mut token, addr(3), 100_000);
        add_liquidity(&mut pool, &mut token, addr(1), 250_000, 500_000);
        swap(&mut pool, &mut token, addr(3), Asset::Base, 12_345);
        swap(&mut pool, &mut token, addr(3), Asset::Token, 6_789);
        swap(&mut pool, &mut token, addr(3), Asset::Base, 101);
        (
            pool.reserve_base(),
            pool.reserve_token(),
            pool.total_shares(),
            pool.k_min(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn host_settles_base_payouts_from_receipts() {
    let alice = addr(1);
    let carol = addr(3);

    let mut pool = deploy_pool(30);
    let mut token = MemoryToken::new();
    fund(&mut token, alice, 400_000);
    fund(&mut token, carol, 100_000);
    add_liquidity(&mut pool, &mut token, alice, 100_000, 400_000);

    // The host tracks native currency owed to callers; the pool only
    // reports it.  Token-in swaps owe base out.
    let mut base_owed: u128 = 0;
    let receipt = swap(&mut pool, &mut token, carol, Asset::Token, 40_000);
    base_owed += receipt.amount_out().get();

    let call = RemoveLiquidityCall {
        caller: alice,
        shares: Shares::new(100_000),
        min_base_out: Amount::ZERO,
        min_token_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(exit) = pool.remove_liquidity(&mut token, call, NOW) else {
        panic!("expected successful remove_liquidity");
    };
    base_owed += exit.base_out().get();

    // Everything the host pays out plus what the pool retains equals
    // everything that was ever attached.
    assert_eq!(base_owed + pool.reserve_base().get(), 100_000);
}

#[test]
fn refund_reported_when_token_offer_caps_deposit() {
    let alice = addr(1);
    let bob = addr(2);

    let mut pool = deploy_pool(30);
    let mut token = MemoryToken::new();
    fund(&mut token, alice, 400_000);
    fund(&mut token, bob, 20_000);
    add_liquidity(&mut pool, &mut token, alice, 100_000, 400_000);

    // Bob attaches far more base than his token offer supports.
    let receipt = add_liquidity(&mut pool, &mut token, bob, 50_000, 20_000);
    assert_eq!(receipt.token_deposited(), Amount::new(20_000));
    assert_eq!(receipt.base_deposited(), Amount::new(5_000));
    assert_eq!(receipt.base_refunded(), Amount::new(45_000));
    // Only the used base entered the reserves.
    assert_eq!(pool.reserve_base(), Amount::new(105_000));
}

#[test]
fn guard_ordering_deadline_before_validation() {
    let mut pool = deploy_pool(30);
    let mut token = MemoryToken::new();

    // Expired deadline wins over the zero-amount validation error.
    let call = SwapCall {
        caller: addr(3),
        asset_in: Asset::Base,
        amount_in: Amount::ZERO,
        min_amount_out: Amount::ZERO,
        deadline: Timestamp::new(NOW.get() - 1),
    };
    assert_eq!(
        pool.swap(&mut token, call, NOW),
        Err(PoolError::DeadlineExpired)
    );
}

#[test]
fn reseeding_after_full_drain_sets_a_new_price() {
    let alice = addr(1);

    let mut pool = deploy_pool(30);
    let mut token = MemoryToken::new();
    fund(&mut token, alice, 1_000_000);
    add_liquidity(&mut pool, &mut token, alice, 100, 400);

    let call = RemoveLiquidityCall {
        caller: alice,
        shares: pool.total_shares(),
        min_base_out: Amount::ZERO,
        min_token_out: Amount::ZERO,
        deadline: deadline(),
    };
    let Ok(_) = pool.remove_liquidity(&mut token, call, NOW) else {
        panic!("expected successful remove_liquidity");
    };
    assert!(pool.is_empty());

    // The next deposit is a fresh seed at a completely different ratio.
    let reseed = add_liquidity(&mut pool, &mut token, alice, 900, 100);
    assert_eq!(reseed.shares_minted(), Shares::new(300));
    assert_eq!(pool.reserve_base(), Amount::new(900));
    assert_eq!(pool.reserve_token(), Amount::new(100));
}

#[test]
fn hostile_token_cannot_reenter_mid_swap() {
    struct HostileToken {
        probe: MemoryToken,
        nested_error: Option<PoolError>,
    }

    impl TokenContract for HostileToken {
        fn allowance(&self, _owner: Address) -> Amount {
            Amount::MAX
        }

        fn transfer_from(
            &mut self,
            pool: &mut dyn PoolEntry,
            owner: Address,
            _amount: Amount,
        ) -> Result<()> {
            let nested = SwapCall {
                caller: owner,
                asset_in: Asset::Token,
                amount_in: Amount::new(1),
                min_amount_out: Amount::ZERO,
                deadline: NOW.plus(300),
            };
            if let Err(err) = pool.swap(&mut self.probe, nested, NOW) {
                self.nested_error = Some(err);
            }
            Ok(())
        }

        fn transfer(
            &mut self,
            _pool: &mut dyn PoolEntry,
            _recipient: Address,
            _amount: Amount,
        ) -> Result<()> {
            Ok(())
        }
    }

    let mut pool = deploy_pool(30);
    let mut seed_token = MemoryToken::new();
    fund(&mut seed_token, addr(1), 400_000);
    add_liquidity(&mut pool, &mut seed_token, addr(1), 100_000, 400_000);

    let mut hostile = HostileToken {
        probe: MemoryToken::new(),
        nested_error: None,
    };
    let call = SwapCall {
        caller: addr(3),
        asset_in: Asset::Token,
        amount_in: Amount::new(10_000),
        min_amount_out: Amount::ZERO,
        deadline: deadline(),
    };
    // The hostile token swallows the nested failure, so the outer swap
    // completes; the nested attempt itself must have been blocked.
    let Ok(_) = pool.swap(&mut hostile, call, NOW) else {
        panic!("expected outer swap to complete");
    };
    assert_eq!(hostile.nested_error, Some(PoolError::ReentrancyBlocked));
}
