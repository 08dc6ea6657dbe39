//! Instrument catalog and per-instrument running day statistics.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::trace;

/// Running statistics for one instrument over the trading day.
///
/// Mutated only by the owning book when a fill occurs, plus the two
/// auction-derived open/close overrides applied at session end.
#[derive(Debug, Clone, Default)]
pub struct DayStats {
    /// First traded price of the day, or the pre-open auction print.
    pub open_price: Option<Decimal>,
    /// Last traded price of the day, or the post-close auction print.
    pub close_price: Option<Decimal>,
    /// Highest trade price seen.
    pub day_high: Option<Decimal>,
    /// Lowest trade price seen.
    pub day_low: Option<Decimal>,
    /// Sum of all trade sizes.
    pub total_volume: u64,
    /// Sum of price x size over all trades; VWAP is derived from this.
    pub vwap_numerator: Decimal,
}

impl DayStats {
    /// Folds one fill into the running statistics.
    pub fn record_trade(&mut self, price: Decimal, volume: u64) {
        if self.open_price.is_none() {
            self.open_price = Some(price);
        }
        self.close_price = Some(price);
        self.day_high = Some(match self.day_high {
            Some(high) => high.max(price),
            None => price,
        });
        self.day_low = Some(match self.day_low {
            Some(low) => low.min(price),
            None => price,
        });
        self.total_volume += volume;
        self.vwap_numerator += price * Decimal::from(volume);
    }

    /// Overrides the open with a crossing pre-open auction print.
    pub fn set_auction_open(&mut self, price: Decimal) {
        self.open_price = Some(price);
    }

    /// Overrides the close with a crossing post-close auction print.
    pub fn set_auction_close(&mut self, price: Decimal) {
        self.close_price = Some(price);
    }

    /// Volume-weighted average price rounded to four decimal places, or
    /// zero when nothing has traded.
    #[must_use]
    pub fn vwap(&self) -> Decimal {
        if self.total_volume == 0 {
            return Decimal::ZERO;
        }
        (self.vwap_numerator / Decimal::from(self.total_volume)).round_dp(4)
    }
}

/// A tradable instrument: immutable definition plus mutable day statistics.
#[derive(Debug, Clone)]
pub struct Instrument {
    /// Short symbol, e.g. `SIA`.
    pub id: String,
    /// ISO-like three-letter currency code.
    pub currency: String,
    /// Minimum quantity increment; order quantities must be positive
    /// multiples of this.
    pub lot_size: u64,
    /// Running day statistics.
    pub stats: DayStats,
}

impl Instrument {
    /// Creates a new instrument with empty day statistics.
    pub fn new(id: impl Into<String>, currency: impl Into<String>, lot_size: u64) -> Self {
        Self {
            id: id.into(),
            currency: currency.into(),
            lot_size,
            stats: DayStats::default(),
        }
    }
}

/// Catalog of tradable instruments, keyed by symbol.
///
/// An explicit registry threaded through construction; instruments are
/// created at ingestion and never destroyed.
#[derive(Debug, Default)]
pub struct InstrumentRegistry {
    instruments: BTreeMap<String, Instrument>,
}

impl InstrumentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instrument. A duplicate id replaces the earlier
    /// definition.
    pub fn insert(&mut self, instrument: Instrument) {
        trace!(
            "Registered instrument {} ({}, lot size {})",
            instrument.id, instrument.currency, instrument.lot_size
        );
        self.instruments.insert(instrument.id.clone(), instrument);
    }

    /// Looks up an instrument by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.get(id)
    }

    /// Mutable lookup, used by books to update day statistics.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Instrument> {
        self.instruments.get_mut(id)
    }

    /// True when the id names a registered instrument.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.instruments.contains_key(id)
    }

    /// Iterates instruments in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    /// Number of registered instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// True when no instrument is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
