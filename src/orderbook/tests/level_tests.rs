//! Tests for the intra-level priority ordering and level draining.

use super::test_helpers::{at, limit_order};
use crate::order::Side;
use crate::orderbook::level::{PriceLevel, RestingOrder};
use rust_decimal_macros::dec;

fn entry(id: &str, rating: u8, time: &str, quantity: u64, seq: u64) -> RestingOrder {
    RestingOrder {
        order: limit_order(id, "X", Side::Buy, dec!(50.0), quantity, rating, time),
        seq,
    }
}

#[test]
fn higher_rating_drains_first() {
    let mut level = PriceLevel::new();
    level.push(entry("LOW", 3, "09:59:00", 100, 0));
    level.push(entry("HIGH", 7, "10:00:00", 100, 1));

    let (executed, fills) = level.match_order(100);
    assert_eq!(executed, 100);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].order_id, "HIGH");
    assert_eq!(level.total_quantity(), 100);
}

#[test]
fn earlier_time_breaks_rating_tie() {
    let mut level = PriceLevel::new();
    level.push(entry("LATE", 5, "10:00:00", 100, 0));
    level.push(entry("EARLY", 5, "09:59:00", 100, 1));

    let (_, fills) = level.match_order(100);
    assert_eq!(fills[0].order_id, "EARLY");
}

#[test]
fn arrival_seq_breaks_full_tie() {
    let mut level = PriceLevel::new();
    level.push(entry("SECOND", 5, "10:00:00", 100, 1));
    level.push(entry("FIRST", 5, "10:00:00", 100, 0));

    let (_, fills) = level.match_order(200);
    assert_eq!(fills[0].order_id, "FIRST");
    assert_eq!(fills[1].order_id, "SECOND");
}

#[test]
fn exhausted_entries_are_removed_immediately() {
    let mut level = PriceLevel::new();
    level.push(entry("A", 5, "10:00:00", 100, 0));
    level.push(entry("B", 4, "10:00:00", 100, 1));

    let (executed, fills) = level.match_order(150);
    assert_eq!(executed, 150);
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].quantity, 100);
    assert_eq!(fills[1].quantity, 50);

    // A is gone, B keeps its residual.
    assert_eq!(level.order_count(), 1);
    assert_eq!(level.total_quantity(), 50);
    assert!(level.iter().all(|entry| entry.order.remaining > 0));
}

#[test]
fn partial_drain_leaves_priority_intact() {
    let mut level = PriceLevel::new();
    level.push(entry("TOP", 9, "10:00:00", 300, 0));
    level.push(entry("NEXT", 2, "09:00:00", 300, 1));

    let (_, first) = level.match_order(100);
    assert_eq!(first[0].order_id, "TOP");

    // TOP still has residual and still outranks NEXT.
    let (_, second) = level.match_order(100);
    assert_eq!(second[0].order_id, "TOP");
}

#[test]
fn match_against_empty_level_is_a_no_op() {
    let mut level = PriceLevel::new();
    let (executed, fills) = level.match_order(500);
    assert_eq!(executed, 0);
    assert!(fills.is_empty());
    assert!(level.is_empty());
}

#[test]
fn time_comparison_uses_the_clock_not_insertion() {
    // Sanity-check the helper: 09:59:00 < 10:00:00.
    assert!(at("09:59:00") < at("10:00:00"));
}
