//! Trade records

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// An executed trade between a bid order and an ask order
///
/// `price` is always the resting order's price — the aggressor gets
/// price improvement, never the reverse. Trades are write-once: nothing
/// mutates a record after the executor mints it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub bid_order_id: OrderId,
    pub ask_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    /// Unix seconds at strike time; informational only
    pub timestamp: i64,
}

impl Trade {
    pub fn new(
        id: TradeId,
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            bid_order_id,
            ask_order_id,
            price,
            quantity,
            timestamp,
        }
    }

    /// Traded value in tick-units (price × quantity)
    pub fn notional(&self) -> u128 {
        self.price.as_u64() as u128 * self.quantity.as_u64() as u128
    }
}
