//! Client registry and the per-(client, instrument, price) position ledger.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A client profile plus its position ledger.
///
/// Positions are kept per instrument and per price as signed quantities: a
/// sell contributes a negative quantity at the sell price, a buy a positive
/// quantity at the trade price. The per-price granularity is retained so
/// average cost could be recovered; the net position on an instrument is the
/// sum of the inner map.
#[derive(Debug, Clone)]
pub struct Client {
    /// Unique client identifier.
    pub id: String,
    /// Currencies this client may trade in.
    pub currencies: BTreeSet<String>,
    /// When set, the client may never go net short: sells are rejected
    /// unless fully covered by the current net position.
    pub position_check: bool,
    /// Priority rating, 1-10, higher matches first within a price level.
    pub rating: u8,
    positions: BTreeMap<String, BTreeMap<Decimal, i64>>,
}

impl Client {
    /// Creates a new client with an empty ledger.
    pub fn new(
        id: impl Into<String>,
        currencies: BTreeSet<String>,
        position_check: bool,
        rating: u8,
    ) -> Self {
        Self {
            id: id.into(),
            currencies,
            position_check,
            rating,
            positions: BTreeMap::new(),
        }
    }

    /// True when the client is allowed to trade in `currency`.
    #[must_use]
    pub fn allows_currency(&self, currency: &str) -> bool {
        self.currencies.contains(currency)
    }

    /// Net position on an instrument: the sum of all per-price quantities.
    /// Zero for an instrument the client has never touched.
    #[must_use]
    pub fn net_position(&self, instrument_id: &str) -> i64 {
        self.positions
            .get(instrument_id)
            .map(|by_price| by_price.values().sum())
            .unwrap_or(0)
    }

    /// Applies a signed quantity delta at a price. This is the only ledger
    /// write point; the book calls it on sell intake (reservation) and on
    /// buy fills.
    pub fn apply_position(&mut self, instrument_id: &str, price: Decimal, delta: i64) {
        let entry = self
            .positions
            .entry(instrument_id.to_string())
            .or_default()
            .entry(price)
            .or_insert(0);
        *entry += delta;
        trace!(
            "Position {} {} @ {}: {:+} -> {}",
            self.id, instrument_id, price, delta, *entry
        );
    }

    /// Instruments this client has touched, in id order, with their net
    /// positions. Drives the client report.
    pub fn net_positions(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positions
            .iter()
            .map(|(instrument_id, by_price)| (instrument_id.as_str(), by_price.values().sum()))
    }

    /// The per-price ledger for one instrument, if touched.
    #[must_use]
    pub fn ledger(&self, instrument_id: &str) -> Option<&BTreeMap<Decimal, i64>> {
        self.positions.get(instrument_id)
    }
}

/// All known clients, keyed by id.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: BTreeMap<String, Client>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client. A duplicate id replaces the earlier profile.
    pub fn insert(&mut self, client: Client) {
        trace!(
            "Registered client {} (rating {}, position check {})",
            client.id, client.rating, client.position_check
        );
        self.clients.insert(client.id.clone(), client);
    }

    /// Looks up a client by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Mutable lookup, used by books for ledger updates.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Client> {
        self.clients.get_mut(id)
    }

    /// Iterates clients in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// True when no client is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
