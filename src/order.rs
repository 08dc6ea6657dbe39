//! Order types: side, limit/market price and the order itself.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use std::fmt;

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy side (bid)
    Buy,
    /// Sell side (offer)
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// Price of an order as submitted: a concrete limit or the market sentinel.
///
/// Market orders are repriced at intake from the opposite touch; until a
/// touch exists they cannot participate in continuous trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPrice {
    /// A concrete limit price.
    Limit(Decimal),
    /// Execute at the prevailing opposite touch.
    Market,
}

impl OrderPrice {
    /// The limit price, if this order carries one.
    #[must_use]
    pub fn limit(&self) -> Option<Decimal> {
        match self {
            OrderPrice::Limit(price) => Some(*price),
            OrderPrice::Market => None,
        }
    }

    /// True when this is the market sentinel.
    #[must_use]
    pub fn is_market(&self) -> bool {
        matches!(self, OrderPrice::Market)
    }
}

impl fmt::Display for OrderPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPrice::Limit(price) => write!(f, "{price}"),
            OrderPrice::Market => write!(f, "Market"),
        }
    }
}

/// Outcome of submitting an accepted order to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Fully executed on arrival.
    Filled,
    /// Partially executed; the residual rests on the book.
    PartiallyFilled,
    /// No execution; the order rests at its limit price.
    Resting,
    /// A market order that found no opposite touch and was dropped.
    Dropped,
}

/// A single client order.
///
/// Orders reference their client and instrument by id only; the registries
/// own the corresponding objects (owners hold strong references downward,
/// book entries hold id-based handles).
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order identifier within the run.
    pub id: String,
    /// Submission time of day.
    pub time: NaiveTime,
    /// Id of the submitting client.
    pub client_id: String,
    /// Id of the instrument being traded.
    pub instrument_id: String,
    /// Buy or sell.
    pub side: Side,
    /// Limit price or market sentinel. Market orders are rewritten to a
    /// concrete limit at book intake.
    pub price: OrderPrice,
    /// Original quantity.
    pub quantity: u64,
    /// Unfilled residual. Invariant: `0 <= remaining <= quantity`.
    pub remaining: u64,
    /// Snapshot of the client's rating at submission (1-10, higher first).
    pub rating: u8,
}

impl Order {
    /// Creates a new order with its full quantity unfilled.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        time: NaiveTime,
        client_id: impl Into<String>,
        instrument_id: impl Into<String>,
        side: Side,
        price: OrderPrice,
        quantity: u64,
        rating: u8,
    ) -> Self {
        Self {
            id: id.into(),
            time,
            client_id: client_id.into(),
            instrument_id: instrument_id.into(),
            side,
            price,
            quantity,
            remaining: quantity,
            rating,
        }
    }

    /// Quantity executed so far.
    #[must_use]
    pub fn filled(&self) -> u64 {
        self.quantity - self.remaining
    }

    /// True when nothing is left to execute.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}/{} @ {}",
            self.id, self.instrument_id, self.side, self.remaining, self.quantity, self.price
        )
    }
}
