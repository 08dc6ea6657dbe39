//! # Single-Venue Equities Exchange Simulator
//!
//! A deterministic, replay-driven exchange simulator. A session ingests a
//! batch of instrument definitions, client profiles and time-stamped orders
//! from CSV, runs each order through a pre-trade validation gate, matches it
//! against a per-instrument limit order book, and emits three CSV reports:
//! client net positions, per-instrument OHLC/VWAP statistics and per-order
//! rejections.
//!
//! ## Key Behaviors
//!
//! - **Price / rating / time priority**: price levels are served strictly
//!   best-to-worst; within a level, resting orders match by client rating
//!   (higher first), then submission time (earlier first). The comparator is
//!   explicit and side-independent.
//! - **Passive price discipline**: every trade prints at the resting
//!   order's price, never the aggressor's.
//! - **Market-order repricing**: a market buy adopts the current highest
//!   offer, a market sell the current lowest bid; with no opposite touch the
//!   order is dropped.
//! - **Opening/closing auctions**: orders at or before 09:30:00 (or at or
//!   after 16:00:00) are also snapshotted into a per-instrument batch; at
//!   session end a single-price uncross maximising matchable volume sets
//!   the instrument's open/close when it crosses.
//! - **Position ledger**: sells reserve their full quantity against the
//!   seller at intake; buys post at the trade price on fill. Clients with
//!   the position-check flag can never go net short.
//!
//! Processing is single-threaded and strictly sequential: orders are
//! handled in input order and the matching loop runs to completion for each.
//! Replays over the same inputs produce bit-identical reports.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! exchange_sim::run(Path::new("input"), Path::new("reports")).unwrap();
//! ```

pub mod client;
pub mod error;
pub mod input;
pub mod instrument;
pub mod order;
pub mod orderbook;
pub mod report;
pub mod session;
pub mod validator;

pub mod prelude;

use std::path::Path;

pub use client::{Client, ClientRegistry};
pub use error::SimError;
pub use instrument::{DayStats, Instrument, InstrumentRegistry};
pub use order::{Order, OrderPrice, OrderStatus, Side};
pub use orderbook::{AuctionOrder, OrderBook, RejectReason, Trade, uncross};
pub use session::{Rejection, Session};

/// Runs a complete session: loads the three inputs from `input_dir`,
/// processes every order in arrival order, uncrosses the auction batches
/// and writes the three reports into `output_dir`.
///
/// # Errors
///
/// Returns a [`SimError`] on malformed input, an order referencing an
/// unregistered client, or any I/O failure. Per-order validation
/// rejections are not errors; they land in the exchange report.
pub fn run(input_dir: &Path, output_dir: &Path) -> Result<(), SimError> {
    let (instruments, clients, orders) = input::load_inputs(input_dir)?;
    let mut session = Session::new(instruments, clients);
    for order in orders {
        session.process(order)?;
    }
    session.finish();
    report::write_reports(output_dir, &session)
}
