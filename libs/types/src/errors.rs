//! Error taxonomy surfaced by the order-facing operations

use crate::ids::OrderId;
use thiserror::Error;

/// Order-specific errors
///
/// `InvalidPrice` and `InvalidQuantity` are rejected before any state
/// change; `NotFound` covers cancels and status queries for ids that are
/// not resting — whether never seen, already filled, or already
/// cancelled, the engine keeps no record to distinguish them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Order not found: {order_id}")]
    NotFound { order_id: OrderId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_price_display() {
        let err = OrderError::InvalidPrice("must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid price: must be positive");
    }

    #[test]
    fn test_not_found_display() {
        let err = OrderError::NotFound {
            order_id: OrderId::from_u64(99),
        };
        assert_eq!(err.to_string(), "Order not found: 99");
    }
}
