//! Core per-instrument order book: two sides of price levels, market-order
//! repricing, the crossing test and auction batch staging.

use super::auction::AuctionOrder;
use super::level::{PriceLevel, RestingOrder};
use super::trade::Trade;
use crate::client::ClientRegistry;
use crate::instrument::DayStats;
use crate::order::{Order, OrderPrice, OrderStatus, Side};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{trace, warn};

/// The limit order book for one instrument.
///
/// Both sides map price levels to priority queues of resting orders. The
/// book owns the continuous matching routine ([`super::matching`]), the
/// trade log, and the two auction batches staged during the session.
pub struct OrderBook {
    /// The instrument this book trades.
    pub(super) symbol: String,

    /// Buy side: price level -> resting orders.
    pub(super) bids: BTreeMap<Decimal, PriceLevel>,

    /// Sell side: price level -> resting orders.
    pub(super) offers: BTreeMap<Decimal, PriceLevel>,

    /// Arrival counter for resting entries; the intra-level determinism
    /// tie-break after rating and time.
    pub(super) next_seq: u64,

    /// Append-only trade log, in execution order.
    pub(super) trades: Vec<Trade>,

    /// Validated orders snapshotted for the opening auction.
    pre_open: Vec<AuctionOrder>,

    /// Validated orders snapshotted for the closing auction.
    post_close: Vec<AuctionOrder>,
}

impl OrderBook {
    /// Creates an empty book for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BTreeMap::new(),
            offers: BTreeMap::new(),
            next_seq: 0,
            trades: Vec::new(),
            pre_open: Vec::new(),
            post_close: Vec::new(),
        }
    }

    /// The instrument id this book trades.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Best (highest) bid price, if any bid rests.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Best (lowest) offer price, if any offer rests.
    #[must_use]
    pub fn best_offer(&self) -> Option<Decimal> {
        self.offers.keys().next().copied()
    }

    /// Submits a validated order: reprice a market order, reserve a short on
    /// sell intake, then match or rest.
    ///
    /// The caller guarantees the order passed the validation gate; the book
    /// performs no further validation.
    pub fn submit(
        &mut self,
        mut order: Order,
        clients: &mut ClientRegistry,
        stats: &mut DayStats,
    ) -> OrderStatus {
        if order.price.is_market() && !self.reprice_market(&mut order) {
            // No opposite touch: the order cannot be priced and is dropped.
            // It is not carried into the exchange report; the report reason
            // set is closed over validation failures.
            warn!(
                "Order {} dropped: market {} on {} with empty opposite side",
                order.id, order.side, self.symbol
            );
            return OrderStatus::Dropped;
        }
        let price = match order.price.limit() {
            Some(price) => price,
            None => return OrderStatus::Dropped,
        };

        // Short reservation: a sell hits the ledger in full at intake, so
        // later sells from the same client see the reduced position.
        if order.side == Side::Sell {
            if let Some(seller) = clients.get_mut(&order.client_id) {
                seller.apply_position(&order.instrument_id, price, -(order.quantity as i64));
            }
        }

        trace!(
            "Book {}: submit {} {} {} @ {}",
            self.symbol, order.id, order.side, order.quantity, price
        );

        let crosses = match order.side {
            Side::Buy => self.best_offer().is_some_and(|offer| price >= offer),
            Side::Sell => self.best_bid().is_some_and(|bid| price <= bid),
        };

        if crosses {
            self.match_incoming(&mut order, clients, stats);
            if order.remaining == 0 {
                OrderStatus::Filled
            } else {
                self.rest(order);
                OrderStatus::PartiallyFilled
            }
        } else {
            self.rest(order);
            OrderStatus::Resting
        }
    }

    /// Rewrites a market order at the opposite touch: a buy adopts the
    /// current highest offer, a sell the current lowest bid. Returns false
    /// when the opposite side is empty.
    fn reprice_market(&self, order: &mut Order) -> bool {
        let adopted = match order.side {
            Side::Buy => self.offers.keys().next_back().copied(),
            Side::Sell => self.bids.keys().next().copied(),
        };
        match adopted {
            Some(price) => {
                trace!("Book {}: market order {} repriced to {}", self.symbol, order.id, price);
                order.price = OrderPrice::Limit(price);
                true
            }
            None => false,
        }
    }

    /// Appends an order to its own side at its limit price.
    pub(super) fn rest(&mut self, order: Order) {
        let Some(price) = order.price.limit() else {
            return;
        };
        let side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.offers,
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        side.entry(price).or_default().push(RestingOrder { order, seq });
    }

    /// Stages a snapshot for the opening auction.
    pub fn stage_pre_open(&mut self, snapshot: AuctionOrder) {
        self.pre_open.push(snapshot);
    }

    /// Stages a snapshot for the closing auction.
    pub fn stage_post_close(&mut self, snapshot: AuctionOrder) {
        self.post_close.push(snapshot);
    }

    /// The staged opening-auction batch.
    #[must_use]
    pub fn pre_open_batch(&self) -> &[AuctionOrder] {
        &self.pre_open
    }

    /// The staged closing-auction batch.
    #[must_use]
    pub fn post_close_batch(&self) -> &[AuctionOrder] {
        &self.post_close
    }

    /// All trades executed on this book, in execution order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Total resting quantity at a bid price level.
    #[must_use]
    pub fn bid_quantity_at(&self, price: Decimal) -> u64 {
        self.bids.get(&price).map_or(0, PriceLevel::total_quantity)
    }

    /// Total resting quantity at an offer price level.
    #[must_use]
    pub fn offer_quantity_at(&self, price: Decimal) -> u64 {
        self.offers.get(&price).map_or(0, PriceLevel::total_quantity)
    }

    /// Number of populated bid price levels.
    #[must_use]
    pub fn bid_level_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of populated offer price levels.
    #[must_use]
    pub fn offer_level_count(&self) -> usize {
        self.offers.len()
    }

    /// Iterates resting orders on one side, best price level first.
    pub fn resting(&self, side: Side) -> impl Iterator<Item = &RestingOrder> {
        let levels: Box<dyn Iterator<Item = &PriceLevel>> = match side {
            Side::Buy => Box::new(self.bids.values().rev()),
            Side::Sell => Box::new(self.offers.values()),
        };
        levels.flat_map(PriceLevel::iter)
    }
}

/// Depth summary: offer levels from worst to best, then bid levels from
/// best to worst, with aggregate resting quantity.
impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== BOOK {} ===", self.symbol)?;
        writeln!(f, "SELL")?;
        if self.offers.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for (price, level) in self.offers.iter().rev() {
            writeln!(f, "  {} {}", price, level.total_quantity())?;
        }
        writeln!(f, "BUY")?;
        if self.bids.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for (price, level) in self.bids.iter().rev() {
            writeln!(f, "  {} {}", price, level.total_quantity())?;
        }
        Ok(())
    }
}
