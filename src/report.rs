//! End-of-session CSV reports: client net positions, instrument day
//! statistics and per-order rejections.

use crate::client::ClientRegistry;
use crate::error::SimError;
use crate::instrument::InstrumentRegistry;
use crate::session::{Rejection, Session};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Client net-position report file name.
pub const CLIENT_REPORT_FILE: &str = "output_client_report.csv";
/// Instrument day-statistics report file name.
pub const INSTRUMENT_REPORT_FILE: &str = "output_instrument_report.csv";
/// Rejection report file name.
pub const EXCHANGE_REPORT_FILE: &str = "output_exchange_report.csv";

#[derive(Debug, Serialize)]
struct ClientReportRow<'a> {
    #[serde(rename = "ClientID")]
    client_id: &'a str,
    #[serde(rename = "InstrumentID")]
    instrument_id: &'a str,
    #[serde(rename = "NetPosition")]
    net_position: i64,
}

#[derive(Debug, Serialize)]
struct InstrumentReportRow<'a> {
    #[serde(rename = "Instrument ID")]
    instrument_id: &'a str,
    #[serde(rename = "OpenPrice")]
    open_price: Option<Decimal>,
    #[serde(rename = "ClosePrice")]
    close_price: Option<Decimal>,
    #[serde(rename = "TotalVolume")]
    total_volume: u64,
    #[serde(rename = "VWAP")]
    vwap: Decimal,
    #[serde(rename = "DayHigh")]
    day_high: Option<Decimal>,
    #[serde(rename = "DayLow")]
    day_low: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct ExchangeReportRow<'a> {
    #[serde(rename = "OrderID")]
    order_id: &'a str,
    #[serde(rename = "RejectionReason")]
    rejection_reason: String,
}

/// Builds a writer that never auto-emits headers; every report writes its
/// header row explicitly so it is present even when no data row follows.
fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(writer)
}

/// Writes one row per (client, instrument) the client touched, sorted by
/// client id then instrument id.
pub fn write_client_report<W: Write>(writer: W, clients: &ClientRegistry) -> Result<(), SimError> {
    let mut csv_writer = csv_writer(writer);
    csv_writer.write_record(["ClientID", "InstrumentID", "NetPosition"])?;
    for client in clients.iter() {
        for (instrument_id, net_position) in client.net_positions() {
            csv_writer.serialize(ClientReportRow {
                client_id: &client.id,
                instrument_id,
                net_position,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes one row per instrument with its final day statistics. Prices
/// never set during the day serialize as empty fields.
pub fn write_instrument_report<W: Write>(
    writer: W,
    instruments: &InstrumentRegistry,
) -> Result<(), SimError> {
    let mut csv_writer = csv_writer(writer);
    csv_writer.write_record([
        "Instrument ID",
        "OpenPrice",
        "ClosePrice",
        "TotalVolume",
        "VWAP",
        "DayHigh",
        "DayLow",
    ])?;
    for instrument in instruments.iter() {
        let stats = &instrument.stats;
        csv_writer.serialize(InstrumentReportRow {
            instrument_id: &instrument.id,
            open_price: stats.open_price,
            close_price: stats.close_price,
            total_volume: stats.total_volume,
            vwap: stats.vwap(),
            day_high: stats.day_high,
            day_low: stats.day_low,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes one row per rejection, in arrival order, with the exact reason
/// strings.
pub fn write_exchange_report<W: Write>(
    writer: W,
    rejections: &[Rejection],
) -> Result<(), SimError> {
    let mut csv_writer = csv_writer(writer);
    csv_writer.write_record(["OrderID", "RejectionReason"])?;
    for rejection in rejections {
        csv_writer.serialize(ExchangeReportRow {
            order_id: &rejection.order_id,
            rejection_reason: rejection.reason.to_string(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the three reports into `dir`, creating it if needed. File handles
/// are scoped so they flush and close on every exit path.
pub fn write_reports(dir: &Path, session: &Session) -> Result<(), SimError> {
    fs::create_dir_all(dir)?;
    write_client_report(File::create(dir.join(CLIENT_REPORT_FILE))?, session.clients())?;
    write_instrument_report(
        File::create(dir.join(INSTRUMENT_REPORT_FILE))?,
        session.instruments(),
    )?;
    write_exchange_report(
        File::create(dir.join(EXCHANGE_REPORT_FILE))?,
        session.rejections(),
    )?;
    info!("Reports written to {}", dir.display());
    Ok(())
}
