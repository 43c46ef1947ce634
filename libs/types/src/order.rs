//! Order lifecycle types

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (bid or ask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// Order status, derived from fill state and book membership
///
/// Nothing stores this: a resting order with no fills is `Open`, a
/// resting order with partial fills is `Partial`, and `Filled` /
/// `Cancelled` describe orders that have already left the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Open,
    Partial,
    Filled,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "OPEN"),
            OrderStatus::Partial => write!(f, "PARTIAL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A single order: immutable identity plus mutable fill state
///
/// `quantity` never changes after creation; matching advances
/// `filled_quantity` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    /// Unix seconds at submission; informational only
    pub timestamp: i64,
}

impl Order {
    /// Create a new unfilled order
    pub fn new(id: OrderId, side: Side, price: Price, quantity: Quantity, timestamp: i64) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            timestamp,
        }
    }

    /// Quantity still open to be filled
    pub fn remaining(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Check if the order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Apply a fill
    ///
    /// # Panics
    /// Panics if the fill would exceed the order quantity.
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.remaining(),
            "Fill would exceed order quantity"
        );
        self.filled_quantity += fill_quantity;
    }

    /// Status of this order while it rests in the book
    pub fn resting_status(&self) -> OrderStatus {
        if self.has_fills() {
            OrderStatus::Partial
        } else {
            OrderStatus::Open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(qty: u64) -> Order {
        Order::new(
            OrderId::from_u64(1),
            Side::Bid,
            Price::from_u64(100),
            Quantity::from_u64(qty),
            1_722_500_000,
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_new_order_is_open() {
        let order = sample_order(10);
        assert_eq!(order.remaining(), Quantity::from_u64(10));
        assert!(!order.is_filled());
        assert!(!order.has_fills());
        assert_eq!(order.resting_status(), OrderStatus::Open);
    }

    #[test]
    fn test_partial_then_full_fill() {
        let mut order = sample_order(10);

        order.add_fill(Quantity::from_u64(4));
        assert_eq!(order.remaining(), Quantity::from_u64(6));
        assert!(order.has_fills());
        assert!(!order.is_filled());
        assert_eq!(order.resting_status(), OrderStatus::Partial);

        order.add_fill(Quantity::from_u64(6));
        assert!(order.is_filled());
        assert!(order.remaining().is_zero());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed order quantity")]
    fn test_overfill_panics() {
        let mut order = sample_order(5);
        order.add_fill(Quantity::from_u64(6));
    }

    #[test]
    fn test_order_serialization() {
        let order = sample_order(3);
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
