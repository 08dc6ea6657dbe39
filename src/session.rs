//! Session controller: routes each order into the auction batches and the
//! continuous book, and closes the day with the two uncrosses.

use crate::client::ClientRegistry;
use crate::error::SimError;
use crate::instrument::InstrumentRegistry;
use crate::order::Order;
use crate::orderbook::{AuctionOrder, OrderBook, RejectReason, Trade, uncross};
use crate::validator::validate;
use chrono::NaiveTime;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Orders at or before this time also join the opening auction batch.
pub const PRE_OPEN_CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(9, 30, 0) {
    Some(time) => time,
    None => panic!("invalid pre-open cutoff"),
};

/// Orders at or after this time also join the closing auction batch.
pub const POST_CLOSE_CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(16, 0, 0) {
    Some(time) => time,
    None => panic!("invalid post-close cutoff"),
};

/// One rejected order: id, submission time and the typed reason.
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Id of the rejected order.
    pub order_id: String,
    /// Submission time of the rejected order.
    pub time: NaiveTime,
    /// Why it was rejected.
    pub reason: RejectReason,
}

/// A full trading session: registries, one book per instrument and the
/// arrival-ordered rejection log.
///
/// Processing is strictly sequential; each order runs validation, staging
/// and matching to completion before the next is read.
pub struct Session {
    instruments: InstrumentRegistry,
    clients: ClientRegistry,
    books: BTreeMap<String, OrderBook>,
    rejections: Vec<Rejection>,
}

impl Session {
    /// Creates a session over ingested registries.
    #[must_use]
    pub fn new(instruments: InstrumentRegistry, clients: ClientRegistry) -> Self {
        info!(
            "Session opened: {} instruments, {} clients",
            instruments.len(),
            clients.len()
        );
        Self {
            instruments,
            clients,
            books: BTreeMap::new(),
            rejections: Vec::new(),
        }
    }

    /// Processes one order end-to-end: rating snapshot, validation,
    /// auction staging, continuous matching.
    ///
    /// Validation rejections are recorded and return `Ok`; only an order
    /// naming an unregistered client is fatal.
    pub fn process(&mut self, mut order: Order) -> Result<(), SimError> {
        let Some(client) = self.clients.get(&order.client_id) else {
            return Err(SimError::UnknownClient {
                order_id: order.id,
                client_id: order.client_id,
            });
        };
        order.rating = client.rating;

        if let Err(reason) = validate(&order, client, &self.instruments) {
            debug!("Order {} rejected: {:?}", order.id, reason);
            self.rejections.push(Rejection {
                order_id: order.id,
                time: order.time,
                reason,
            });
            return Ok(());
        }

        let book = self
            .books
            .entry(order.instrument_id.clone())
            .or_insert_with(|| OrderBook::new(order.instrument_id.clone()));

        // Auction staging happens before matching so the snapshot carries
        // the submitted quantity, and the orders still run the continuous
        // path below.
        if order.time <= PRE_OPEN_CUTOFF {
            book.stage_pre_open(AuctionOrder::snapshot(&order));
        }
        if order.time >= POST_CLOSE_CUTOFF {
            book.stage_post_close(AuctionOrder::snapshot(&order));
        }

        let Some(instrument) = self.instruments.get_mut(&order.instrument_id) else {
            // Validation guarantees the instrument exists.
            return Ok(());
        };
        book.submit(order, &mut self.clients, &mut instrument.stats);
        Ok(())
    }

    /// Closes the session: uncrosses the pre-open and post-close batches of
    /// every book and applies crossing prints to the instrument's
    /// open/close. Without a crossing auction the first/last continuous
    /// trade stands.
    pub fn finish(&mut self) {
        for (symbol, book) in &self.books {
            let Some(instrument) = self.instruments.get_mut(symbol) else {
                continue;
            };
            debug!("End-of-day depth\n{book}");
            if let Some(price) = uncross(book.pre_open_batch()) {
                info!("Opening auction {symbol}: crossed at {price}");
                instrument.stats.set_auction_open(price);
            }
            if let Some(price) = uncross(book.post_close_batch()) {
                info!("Closing auction {symbol}: crossed at {price}");
                instrument.stats.set_auction_close(price);
            }
        }
        let trade_count: usize = self.books.values().map(|book| book.trades().len()).sum();
        info!(
            "Session closed: {} trades, {} rejections",
            trade_count,
            self.rejections.len()
        );
    }

    /// The instrument registry with its final day statistics.
    #[must_use]
    pub fn instruments(&self) -> &InstrumentRegistry {
        &self.instruments
    }

    /// The client registry with its final ledgers.
    #[must_use]
    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    /// Rejections in arrival order.
    #[must_use]
    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// The book for an instrument, if any order reached it.
    #[must_use]
    pub fn book(&self, instrument_id: &str) -> Option<&OrderBook> {
        self.books.get(instrument_id)
    }

    /// All trades of the session, grouped by instrument id order.
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.books.values().flat_map(|book| book.trades().iter())
    }
}
