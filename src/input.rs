//! CSV ingestion for the three session inputs.
//!
//! All inputs carry a header row. Schema violations are fatal
//! (`MalformedInput`); validation of order economics happens later, per
//! order, in the validation gate.

use crate::client::{Client, ClientRegistry};
use crate::error::SimError;
use crate::instrument::{Instrument, InstrumentRegistry};
use crate::order::{Order, OrderPrice, Side};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Client profiles input file name.
pub const CLIENTS_FILE: &str = "input_clients.csv";
/// Instrument definitions input file name.
pub const INSTRUMENTS_FILE: &str = "input_instruments.csv";
/// Orders input file name.
pub const ORDERS_FILE: &str = "input_orders.csv";

#[derive(Debug, Deserialize)]
struct ClientRecord {
    #[serde(rename = "ClientID")]
    id: String,
    #[serde(rename = "Currencies")]
    currencies: String,
    #[serde(rename = "PositionCheck")]
    position_check: String,
    #[serde(rename = "Rating")]
    rating: u8,
}

#[derive(Debug, Deserialize)]
struct InstrumentRecord {
    #[serde(rename = "InstrumentID")]
    id: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "LotSize")]
    lot_size: u64,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(rename = "OrderID")]
    id: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Client")]
    client: String,
    #[serde(rename = "Instrument")]
    instrument: String,
    #[serde(rename = "Side")]
    side: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Quantity")]
    quantity: u64,
}

fn malformed(path: &Path, message: impl Into<String>) -> SimError {
    SimError::MalformedInput {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn read_clients<R: Read>(reader: R, path: &Path) -> Result<ClientRegistry, SimError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut clients = ClientRegistry::new();
    for record in csv_reader.deserialize() {
        let record: ClientRecord = record.map_err(|e| malformed(path, e.to_string()))?;
        let currencies: BTreeSet<String> = record
            .currencies
            .split(',')
            .map(|currency| currency.trim().to_string())
            .filter(|currency| !currency.is_empty())
            .collect();
        let position_check = match record.position_check.trim() {
            "Y" => true,
            "N" => false,
            other => {
                return Err(malformed(
                    path,
                    format!("client {}: PositionCheck must be Y or N, got {other:?}", record.id),
                ));
            }
        };
        if !(1..=10).contains(&record.rating) {
            return Err(malformed(
                path,
                format!("client {}: Rating must be 1-10, got {}", record.id, record.rating),
            ));
        }
        clients.insert(Client::new(record.id, currencies, position_check, record.rating));
    }
    Ok(clients)
}

fn read_instruments<R: Read>(reader: R, path: &Path) -> Result<InstrumentRegistry, SimError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut instruments = InstrumentRegistry::new();
    for record in csv_reader.deserialize() {
        let record: InstrumentRecord = record.map_err(|e| malformed(path, e.to_string()))?;
        if record.lot_size == 0 {
            return Err(malformed(
                path,
                format!("instrument {}: LotSize must be positive", record.id),
            ));
        }
        instruments.insert(Instrument::new(record.id, record.currency, record.lot_size));
    }
    Ok(instruments)
}

fn read_orders<R: Read>(reader: R, path: &Path) -> Result<Vec<Order>, SimError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut orders = Vec::new();
    for record in csv_reader.deserialize() {
        let record: OrderRecord = record.map_err(|e| malformed(path, e.to_string()))?;
        let time = NaiveTime::parse_from_str(record.time.trim(), "%H:%M:%S")
            .map_err(|e| malformed(path, format!("order {}: bad Time: {e}", record.id)))?;
        let side = match record.side.trim() {
            "Buy" => Side::Buy,
            "Sell" => Side::Sell,
            other => {
                return Err(malformed(
                    path,
                    format!("order {}: Side must be Buy or Sell, got {other:?}", record.id),
                ));
            }
        };
        let price = match record.price.trim() {
            "Market" => OrderPrice::Market,
            literal => OrderPrice::Limit(Decimal::from_str(literal).map_err(|e| {
                malformed(path, format!("order {}: bad Price {literal:?}: {e}", record.id))
            })?),
        };
        // The rating snapshot is taken when the session resolves the client.
        orders.push(Order::new(
            record.id,
            time,
            record.client,
            record.instrument,
            side,
            price,
            record.quantity,
            0,
        ));
    }
    Ok(orders)
}

/// Loads the three inputs from `dir` using the fixed file names.
pub fn load_inputs(
    dir: &Path,
) -> Result<(InstrumentRegistry, ClientRegistry, Vec<Order>), SimError> {
    let open = |name: &str| -> Result<(File, PathBuf), SimError> {
        let path = dir.join(name);
        let file = File::open(&path)?;
        Ok((file, path))
    };

    let (file, path) = open(INSTRUMENTS_FILE)?;
    let instruments = read_instruments(file, &path)?;
    let (file, path) = open(CLIENTS_FILE)?;
    let clients = read_clients(file, &path)?;
    let (file, path) = open(ORDERS_FILE)?;
    let orders = read_orders(file, &path)?;

    info!(
        "Loaded {} instruments, {} clients, {} orders from {}",
        instruments.len(),
        clients.len(),
        orders.len(),
        dir.display()
    );
    Ok((instruments, clients, orders))
}
