//! Fatal error taxonomy for a simulation run.
//!
//! Per-order validation rejections are not errors at this level; they are
//! recorded in the exchange report and never halt the session. Everything
//! here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// A fatal failure that aborts the simulation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// An input row could not be parsed into its domain type.
    #[error("malformed input in {path}: {message}")]
    MalformedInput {
        /// The input file containing the bad row.
        path: PathBuf,
        /// What failed to parse.
        message: String,
    },

    /// An order references a client id that was never registered.
    #[error("order {order_id} references unknown client {client_id}")]
    UnknownClient {
        /// The offending order id.
        order_id: String,
        /// The unregistered client id.
        client_id: String,
    },

    /// CSV-level read or write failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure on inputs or reports.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
