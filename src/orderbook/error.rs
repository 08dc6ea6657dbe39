//! Typed rejection reasons raised by the pre-trade validation gate.

use std::fmt;

/// Why an order was rejected before reaching the book.
///
/// `Display` renders the exact reason string carried into the exchange
/// report; the context fields are for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectReason {
    /// The order references an instrument the registry does not know.
    InstrumentNotFound {
        /// The unrecognised instrument id.
        instrument_id: String,
    },

    /// The instrument trades in a currency the client is not allowed.
    MismatchCurrency {
        /// The instrument's currency.
        currency: String,
    },

    /// The quantity is zero or not a multiple of the instrument's lot size.
    InvalidLotSize {
        /// The order quantity that failed validation.
        quantity: u64,
        /// The instrument's configured lot size.
        lot_size: u64,
    },

    /// A sell from a position-checked client that its net position does not
    /// cover. Sells from a fresh position fail the same way.
    PositionCheckFailed {
        /// The client's net position at validation time.
        net_position: i64,
        /// The sell quantity requested.
        quantity: u64,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InstrumentNotFound { .. } => {
                write!(f, "REJECTED - INSTRUMENT NOT FOUND")
            }
            RejectReason::MismatchCurrency { .. } => write!(f, "REJECTED - MISMATCH CURRENCY"),
            RejectReason::InvalidLotSize { .. } => write!(f, "REJECTED - INVALID LOT SIZE"),
            RejectReason::PositionCheckFailed { .. } => {
                write!(f, "REJECTED - POSITION CHECK FAILED")
            }
        }
    }
}

impl std::error::Error for RejectReason {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_strings() {
        let reasons = [
            (
                RejectReason::InstrumentNotFound {
                    instrument_id: "XYZ".to_string(),
                },
                "REJECTED - INSTRUMENT NOT FOUND",
            ),
            (
                RejectReason::MismatchCurrency {
                    currency: "SGD".to_string(),
                },
                "REJECTED - MISMATCH CURRENCY",
            ),
            (
                RejectReason::InvalidLotSize {
                    quantity: 12,
                    lot_size: 100,
                },
                "REJECTED - INVALID LOT SIZE",
            ),
            (
                RejectReason::PositionCheckFailed {
                    net_position: 0,
                    quantity: 100,
                },
                "REJECTED - POSITION CHECK FAILED",
            ),
        ];

        for (reason, expected) in reasons {
            assert_eq!(reason.to_string(), expected);
        }
    }
}
