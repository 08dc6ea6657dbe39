//! Continuous matching: the loop that crosses an incoming order against
//! resting liquidity.
//!
//! Levels are visited strictly best-to-worst; within a level the priority
//! queue decides (rating desc, time asc). Every trade prints at the resting
//! order's price.

use super::book::OrderBook;
use super::level::LevelFill;
use super::trade::Trade;
use crate::client::ClientRegistry;
use crate::instrument::DayStats;
use crate::order::{Order, Side};
use rust_decimal::Decimal;
use tracing::{trace, warn};

impl OrderBook {
    /// Crosses `incoming` against the opposite side until it fills or the
    /// next level no longer matches its limit. The caller rests any
    /// residual.
    pub(super) fn match_incoming(
        &mut self,
        incoming: &mut Order,
        clients: &mut ClientRegistry,
        stats: &mut DayStats,
    ) {
        let Some(limit) = incoming.price.limit() else {
            return;
        };
        let is_sell = incoming.side == Side::Sell;

        // Opposite levels in match order: ascending offers for a buy,
        // descending bids for a sell.
        let prices: Vec<Decimal> = if is_sell {
            self.bids.keys().rev().copied().collect()
        } else {
            self.offers.keys().copied().collect()
        };

        for price in prices {
            if incoming.remaining == 0 {
                break;
            }
            let still_matches = if is_sell { limit <= price } else { limit >= price };
            if !still_matches {
                break;
            }

            let level = if is_sell {
                self.bids.get_mut(&price)
            } else {
                self.offers.get_mut(&price)
            };
            let Some(level) = level else {
                continue;
            };

            let (executed, fills) = level.match_order(incoming.remaining);
            let emptied = level.is_empty();
            incoming.remaining -= executed;

            for fill in &fills {
                self.settle_fill(incoming, fill, price, clients, stats);
            }

            if emptied {
                let side = if is_sell { &mut self.bids } else { &mut self.offers };
                side.remove(&price);
                trace!("Book {}: price level {} exhausted", self.symbol, price);
            }
        }
    }

    /// Books one fill: trade log, instrument statistics and the buyer's
    /// ledger. The seller's reservation was already applied at intake, so
    /// no seller write happens here.
    fn settle_fill(
        &mut self,
        incoming: &Order,
        fill: &LevelFill,
        price: Decimal,
        clients: &mut ClientRegistry,
        stats: &mut DayStats,
    ) {
        let (buyer, seller) = match incoming.side {
            Side::Buy => (incoming.client_id.as_str(), fill.client_id.as_str()),
            Side::Sell => (fill.client_id.as_str(), incoming.client_id.as_str()),
        };

        stats.record_trade(price, fill.quantity);

        if let Some(client) = clients.get_mut(buyer) {
            client.apply_position(&incoming.instrument_id, price, fill.quantity as i64);
        } else {
            warn!("Book {}: fill for unknown buyer {}", self.symbol, buyer);
        }

        let trade = Trade::new(
            incoming.time,
            buyer,
            seller,
            self.symbol.clone(),
            price,
            fill.quantity,
        );
        trace!("{trade}");
        self.trades.push(trade);
    }
}
