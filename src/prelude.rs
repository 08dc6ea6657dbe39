//! Prelude module that re-exports the commonly used types.
//!
//! ```rust
//! use exchange_sim::prelude::*;
//! ```

// Core book types
pub use crate::orderbook::{AuctionOrder, OrderBook, RejectReason, Trade, uncross};

// Orders
pub use crate::order::{Order, OrderPrice, OrderStatus, Side};

// Registries and the ledger
pub use crate::client::{Client, ClientRegistry};
pub use crate::instrument::{DayStats, Instrument, InstrumentRegistry};

// Session orchestration
pub use crate::session::{POST_CLOSE_CUTOFF, PRE_OPEN_CUTOFF, Rejection, Session};

// Validation gate
pub use crate::validator::validate;

// Fatal errors
pub use crate::error::SimError;
