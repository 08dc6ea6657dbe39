//! Trade records emitted by the matching engine.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use std::fmt;

/// One executed trade.
///
/// Trades are append-only: the matching loop pushes them onto the book's
/// trade log in the exact order resting orders were visited. The timestamp
/// is the aggressor order's submission time, keeping replays bit-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    /// Time of the aggressor order that produced this trade.
    pub time: NaiveTime,
    /// Id of the buying client.
    pub buyer: String,
    /// Id of the selling client.
    pub seller: String,
    /// Instrument traded.
    pub instrument: String,
    /// Execution price; always the resting (passive) order's price.
    pub price: Decimal,
    /// Executed quantity.
    pub volume: u64,
}

impl Trade {
    /// Creates a new trade record.
    pub fn new(
        time: NaiveTime,
        buyer: impl Into<String>,
        seller: impl Into<String>,
        instrument: impl Into<String>,
        price: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            time,
            buyer: buyer.into(),
            seller: seller.into(),
            instrument: instrument.into(),
            price,
            volume,
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} EXECUTE BUY {} SELL {} {} {} @ {}",
            self.time, self.buyer, self.seller, self.volume, self.instrument, self.price
        )
    }
}
