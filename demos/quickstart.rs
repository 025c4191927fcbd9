//! Deploy a pool, provide liquidity, and trade against it.
//!
//! Run with `RUST_LOG=cpamm=debug` to see the pool's internal events.

use cpamm::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpamm=info".into()),
        )
        .init();

    let now = Timestamp::new(1_700_000_000);
    let alice = Address::from_bytes([1; 20]);
    let bob = Address::from_bytes([2; 20]);

    let config = PoolConfig::new(
        Address::from_bytes([0xee; 20]),
        BasisPoints::new(30),
        InitialMintRule::GeometricMean,
    )?;
    let mut pool = Pool::deploy(config)?;

    let mut token = MemoryToken::new();
    token.mint_to(alice, Amount::new(4_000_000));
    token.approve(alice, Amount::new(4_000_000));
    token.mint_to(bob, Amount::new(100_000));
    token.approve(bob, Amount::new(100_000));

    // Alice seeds the pool at 1 base : 4 token.
    let seed = pool.add_liquidity(
        &mut token,
        AddLiquidityCall {
            caller: alice,
            base_deposit: Amount::new(1_000_000),
            token_desired: Amount::new(4_000_000),
            deadline: now.plus(60),
        },
        now,
    )?;
    println!(
        "seeded: {} shares against {} base / {} token",
        seed.shares_minted(),
        seed.base_deposited(),
        seed.token_deposited()
    );

    // Bob previews, then trades with the quote as his slippage floor.
    let quote = pool.quote(Asset::Base, Amount::new(50_000))?;
    println!("quote: {quote}");

    let swap = pool.swap(
        &mut token,
        SwapCall {
            caller: bob,
            asset_in: Asset::Base,
            amount_in: Amount::new(50_000),
            min_amount_out: quote.amount_out(),
            deadline: now.plus(60),
        },
        now,
    )?;
    println!(
        "swapped {} base for {} token (fee {})",
        swap.amount_in(),
        swap.amount_out(),
        swap.fee()
    );

    // Alice exits; the accrued fee makes her whole and then some.
    let exit = pool.remove_liquidity(
        &mut token,
        RemoveLiquidityCall {
            caller: alice,
            shares: pool.shares_of(alice),
            min_base_out: Amount::ZERO,
            min_token_out: Amount::ZERO,
            deadline: now.plus(60),
        },
        now,
    )?;
    println!(
        "exited: {} base / {} token for {} shares",
        exit.base_out(),
        exit.token_out(),
        exit.shares_burned()
    );

    Ok(())
}
