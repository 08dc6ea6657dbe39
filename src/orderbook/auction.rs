//! Single-price uncross for the opening and closing auctions.
//!
//! The engine consumes an unordered batch of immutable order snapshots and
//! reports one price; it never mutates the book, the ledger or the
//! statistics. The session feeds the result into the instrument's
//! open/close.

use crate::order::{Order, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// An immutable snapshot of a validated order staged for an auction.
///
/// Snapshots are taken before continuous matching can decrement the live
/// order's residual, so the batch always sees the submitted quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionOrder {
    /// Buy or sell.
    pub side: Side,
    /// Limit price, or `None` for a market order. Market orders are
    /// repriced from the batch's own limit extremes during the uncross.
    pub price: Option<Decimal>,
    /// Submitted quantity.
    pub quantity: u64,
}

impl AuctionOrder {
    /// Snapshots a live order for auction input.
    #[must_use]
    pub fn snapshot(order: &Order) -> Self {
        Self {
            side: order.side,
            price: order.price.limit(),
            quantity: order.quantity,
        }
    }
}

/// Computes the single uncross price for a batch, or `None` when no price
/// crosses.
///
/// Market buys join the batch's highest limit offer; market sells its
/// lowest limit bid; without an opposite limit they cannot participate.
/// The winning price maximises the matchable volume
/// `min(cum_bid(p), cum_offer(p))`; ties are broken by walking offer prices
/// upward with the most-popular bid level's demand and taking the first
/// tied price at which that demand is exhausted.
#[must_use]
pub fn uncross(batch: &[AuctionOrder]) -> Option<Decimal> {
    let mut bids: BTreeMap<Decimal, u64> = BTreeMap::new();
    let mut offers: BTreeMap<Decimal, u64> = BTreeMap::new();
    let mut market_buys = 0u64;
    let mut market_sells = 0u64;

    for order in batch {
        match (order.side, order.price) {
            (Side::Buy, Some(price)) => *bids.entry(price).or_insert(0) += order.quantity,
            (Side::Sell, Some(price)) => *offers.entry(price).or_insert(0) += order.quantity,
            (Side::Buy, None) => market_buys += order.quantity,
            (Side::Sell, None) => market_sells += order.quantity,
        }
    }

    // Market orders adopt the opposite extreme limit from the same batch.
    let max_offer = offers.keys().next_back().copied();
    let min_bid = bids.keys().next().copied();
    if market_buys > 0 {
        match max_offer {
            Some(price) => *bids.entry(price).or_insert(0) += market_buys,
            None => trace!("auction: {market_buys} market buy qty with no limit offer, skipped"),
        }
    }
    if market_sells > 0 {
        match min_bid {
            Some(price) => *offers.entry(price).or_insert(0) += market_sells,
            None => trace!("auction: {market_sells} market sell qty with no limit bid, skipped"),
        }
    }

    if bids.is_empty() || offers.is_empty() {
        return None;
    }

    let matchable = |price: Decimal| -> u64 {
        let cum_bid: u64 = bids.range(price..).map(|(_, quantity)| quantity).sum();
        let cum_offer: u64 = offers.range(..=price).map(|(_, quantity)| quantity).sum();
        cum_bid.min(cum_offer)
    };

    let prices: BTreeSet<Decimal> = bids.keys().chain(offers.keys()).copied().collect();
    let best = prices.iter().map(|&price| matchable(price)).max()?;
    if best == 0 {
        return None;
    }

    let ties: Vec<Decimal> = prices
        .iter()
        .copied()
        .filter(|&price| matchable(price) == best)
        .collect();
    if ties.len() == 1 {
        return ties.first().copied();
    }

    // Most-popular bid level's quantity, higher price winning equal
    // quantities, walked through offer prices in ascending order.
    let mut demand = 0u64;
    for &quantity in bids.values() {
        if quantity >= demand {
            demand = quantity;
        }
    }
    let mut offered = 0u64;
    for (&price, &quantity) in &offers {
        offered += quantity;
        if offered >= demand && ties.contains(&price) {
            return Some(price);
        }
    }
    ties.last().copied()
}
