//! Property tests for the universal invariants of the matching core.

use chrono::NaiveTime;
use exchange_sim::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

const INSTRUMENT: &str = "SIA";
const LOT: u64 = 100;

/// Client ids with fixed ratings; "C2" runs with the position check on.
const CLIENT_SPECS: [(&str, u8, bool); 4] =
    [("C0", 3, false), ("C1", 8, false), ("C2", 5, true), ("C3", 5, false)];

#[derive(Debug, Clone)]
struct OrderSpec {
    client: usize,
    is_sell: bool,
    price_ticks: u32,
    lots: u64,
    minute: u32,
}

fn order_spec() -> impl Strategy<Value = OrderSpec> {
    (0..CLIENT_SPECS.len(), any::<bool>(), 0u32..8, 1u64..6, 0u32..360).prop_map(
        |(client, is_sell, price_ticks, lots, minute)| OrderSpec {
            client,
            is_sell,
            price_ticks,
            lots,
            minute,
        },
    )
}

fn build_session() -> Session {
    let mut instruments = InstrumentRegistry::new();
    instruments.insert(Instrument::new(INSTRUMENT, "SGD", LOT));
    let mut clients = ClientRegistry::new();
    for (id, rating, position_check) in CLIENT_SPECS {
        clients.insert(Client::new(
            id,
            BTreeSet::from(["SGD".to_string()]),
            position_check,
            rating,
        ));
    }
    Session::new(instruments, clients)
}

fn build_order(index: usize, spec: &OrderSpec) -> Order {
    // Prices 32.0, 32.1, ... 32.7; times spread across the session.
    let price = Decimal::new(320 + spec.price_ticks as i64, 1);
    let time = NaiveTime::from_hms_opt(10 + spec.minute / 60, spec.minute % 60, 0).unwrap();
    Order::new(
        format!("O{index}"),
        time,
        CLIENT_SPECS[spec.client].0,
        INSTRUMENT,
        if spec.is_sell { Side::Sell } else { Side::Buy },
        OrderPrice::Limit(price),
        spec.lots * LOT,
        0,
    )
}

proptest! {
    /// Accepted quantity is conserved: everything submitted on a side is
    /// either traded or still resting with a positive residual.
    #[test]
    fn accepted_quantity_is_traded_or_resting(specs in proptest::collection::vec(order_spec(), 1..60)) {
        let mut session = build_session();
        let mut accepted_buy = 0u64;
        let mut accepted_sell = 0u64;

        for (index, spec) in specs.iter().enumerate() {
            let order = build_order(index, spec);
            let before = session.rejections().len();
            session.process(order).unwrap();
            if session.rejections().len() == before {
                if spec.is_sell {
                    accepted_sell += spec.lots * LOT;
                } else {
                    accepted_buy += spec.lots * LOT;
                }
            }
        }

        let traded: u64 = session.trades().map(|trade| trade.volume).sum();
        let (resting_buy, resting_sell) = match session.book(INSTRUMENT) {
            Some(book) => (
                book.resting(Side::Buy).map(|entry| entry.order.remaining).sum::<u64>(),
                book.resting(Side::Sell).map(|entry| entry.order.remaining).sum::<u64>(),
            ),
            None => (0, 0),
        };

        prop_assert_eq!(accepted_buy, traded + resting_buy);
        prop_assert_eq!(accepted_sell, traded + resting_sell);
    }

    /// No resting order ever carries a zero or overflowed residual.
    #[test]
    fn residuals_stay_within_bounds(specs in proptest::collection::vec(order_spec(), 1..60)) {
        let mut session = build_session();
        for (index, spec) in specs.iter().enumerate() {
            session.process(build_order(index, spec)).unwrap();
        }

        if let Some(book) = session.book(INSTRUMENT) {
            for side in [Side::Buy, Side::Sell] {
                for entry in book.resting(side) {
                    prop_assert!(entry.order.remaining > 0);
                    prop_assert!(entry.order.remaining <= entry.order.quantity);
                }
            }
        }
    }

    /// A position-checked client never goes net short, at any point in the
    /// session.
    #[test]
    fn position_check_soundness(specs in proptest::collection::vec(order_spec(), 1..60)) {
        let mut session = build_session();
        for (index, spec) in specs.iter().enumerate() {
            session.process(build_order(index, spec)).unwrap();
            let net = session.clients().get("C2").unwrap().net_position(INSTRUMENT);
            prop_assert!(net >= 0, "position-checked client went short: {}", net);
        }
    }

    /// The instrument's volume equals the trade log, and every trade prints
    /// at a price some submitted order carried.
    #[test]
    fn stats_agree_with_the_trade_log(specs in proptest::collection::vec(order_spec(), 1..60)) {
        let mut session = build_session();
        let mut submitted_prices = BTreeSet::new();
        for (index, spec) in specs.iter().enumerate() {
            let order = build_order(index, spec);
            if let Some(price) = order.price.limit() {
                submitted_prices.insert(price);
            }
            session.process(order).unwrap();
        }
        session.finish();

        let traded: u64 = session.trades().map(|trade| trade.volume).sum();
        let stats = &session.instruments().get(INSTRUMENT).unwrap().stats;
        prop_assert_eq!(stats.total_volume, traded);
        for trade in session.trades() {
            prop_assert!(submitted_prices.contains(&trade.price));
        }
    }

    /// Replaying the same order stream yields an identical trade log and
    /// rejection log.
    #[test]
    fn replay_is_deterministic(specs in proptest::collection::vec(order_spec(), 1..40)) {
        let run = |specs: &[OrderSpec]| {
            let mut session = build_session();
            for (index, spec) in specs.iter().enumerate() {
                session.process(build_order(index, spec)).unwrap();
            }
            session.finish();
            let trades: Vec<Trade> = session.trades().cloned().collect();
            let rejections: Vec<String> =
                session.rejections().iter().map(|r| format!("{}:{}", r.order_id, r.reason)).collect();
            (trades, rejections)
        };

        let first = run(&specs);
        let second = run(&specs);
        prop_assert_eq!(first, second);
    }
}
