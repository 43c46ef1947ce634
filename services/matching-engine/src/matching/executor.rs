//! Trade execution logic
//!
//! Mints trade records with monotonically increasing ids. The executor
//! owns the trade-id counter; the engine seeds it from the trade
//! journal at startup so ids keep increasing across restarts.

use types::ids::{OrderId, TradeId};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Match executor for trade generation
pub struct MatchExecutor {
    next_trade_id: u64,
}

impl MatchExecutor {
    /// Create a new executor; `starting_trade_id` is the id the next
    /// trade will carry
    pub fn new(starting_trade_id: u64) -> Self {
        Self {
            next_trade_id: starting_trade_id,
        }
    }

    /// The id the next trade will carry
    pub fn next_trade_id(&self) -> u64 {
        self.next_trade_id
    }

    /// Mint a trade between a bid order and an ask order
    ///
    /// `price` must be the resting order's price; the caller has already
    /// decided which side was resting.
    pub fn execute_trade(
        &mut self,
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Trade {
        debug_assert!(!quantity.is_zero(), "trade quantity must be positive");
        let id = TradeId::from_u64(self.next_trade_id);
        self.next_trade_id += 1;
        Trade::new(id, bid_order_id, ask_order_id, price, quantity, timestamp)
    }
}
