//! Pre-trade validation gate.

use crate::client::Client;
use crate::instrument::InstrumentRegistry;
use crate::order::{Order, Side};
use crate::orderbook::RejectReason;

/// Validates a candidate order against its client and the instrument
/// catalog.
///
/// Side-effect free. Rules run in a fixed order and the first failure is
/// reported:
///
/// 1. the instrument must exist,
/// 2. its currency must be allowed for the client,
/// 3. the quantity must be a positive multiple of the lot size,
/// 4. a sell from a position-checked client must be covered by the
///    client's current net position.
pub fn validate(
    order: &Order,
    client: &Client,
    instruments: &InstrumentRegistry,
) -> Result<(), RejectReason> {
    let Some(instrument) = instruments.get(&order.instrument_id) else {
        return Err(RejectReason::InstrumentNotFound {
            instrument_id: order.instrument_id.clone(),
        });
    };

    if !client.allows_currency(&instrument.currency) {
        return Err(RejectReason::MismatchCurrency {
            currency: instrument.currency.clone(),
        });
    }

    if order.quantity == 0 || order.quantity % instrument.lot_size != 0 {
        return Err(RejectReason::InvalidLotSize {
            quantity: order.quantity,
            lot_size: instrument.lot_size,
        });
    }

    if order.side == Side::Sell && client.position_check {
        let net_position = client.net_position(&order.instrument_id);
        if net_position < order.quantity as i64 {
            return Err(RejectReason::PositionCheckFailed {
                net_position,
                quantity: order.quantity,
            });
        }
    }

    Ok(())
}
