//! matchbook - demo binary.
//!
//! Seeds an in-memory settlement adapter, crosses a few orders and prints
//! the resulting book and trades.

use matchbook::engine::MatchingEngine;
use matchbook::settlement::{Asset, MemorySettlement};
use matchbook::types::price::{from_fixed, to_fixed};
use matchbook::types::{Side, TimeInForce};

fn main() {
    tracing_subscriber::fmt::init();

    let mut settlement = MemorySettlement::new();
    for owner in 1..=3u64 {
        settlement.deposit(owner, Asset::Base, to_fixed("1000").unwrap());
        settlement.deposit(owner, Asset::Quote, to_fixed("100000").unwrap());
    }

    let mut engine = MatchingEngine::with_capacity(settlement, 1_000);
    let gtc = TimeInForce::GoodTillCancel;

    // Build a small book
    engine
        .place_order(1, Side::Sell, to_fixed("50.5").unwrap(), to_fixed("10").unwrap(), gtc, 1)
        .expect("ask rests");
    engine
        .place_order(2, Side::Sell, to_fixed("51").unwrap(), to_fixed("5").unwrap(), gtc, 2)
        .expect("ask rests");
    engine
        .place_order(3, Side::Buy, to_fixed("49.5").unwrap(), to_fixed("8").unwrap(), gtc, 3)
        .expect("bid rests");

    println!("book after seeding:");
    print_top(&engine);

    // Cross the spread
    let result = engine
        .place_order(3, Side::Buy, to_fixed("50.5").unwrap(), to_fixed("6").unwrap(), gtc, 4)
        .expect("buy matches");

    println!();
    println!("incoming buy 6 @ 50.5 -> status {:?}, filled {}", result.status, from_fixed(result.filled));
    for trade in &result.trades {
        println!(
            "  trade #{}: {} @ {} (maker order {})",
            trade.id,
            from_fixed(trade.quantity),
            from_fixed(trade.price),
            trade.maker_order_id,
        );
    }

    println!();
    println!("book after matching:");
    print_top(&engine);

    println!();
    println!("state root: {}", hex::encode(engine.book().state_root()));
}

fn print_top(engine: &MatchingEngine<MemorySettlement>) {
    match engine.best_price(Side::Buy) {
        Some((price, volume)) => {
            println!("  best bid: {} x {}", from_fixed(price), from_fixed(volume))
        }
        None => println!("  best bid: none"),
    }
    match engine.best_price(Side::Sell) {
        Some((price, volume)) => {
            println!("  best ask: {} x {}", from_fixed(price), from_fixed(volume))
        }
        None => println!("  best ask: none"),
    }
}
