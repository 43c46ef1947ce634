//! Crossing detection logic
//!
//! Determines when a bid and an ask can trade based on price
//! compatibility.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and an ask can trade at the given prices
///
/// A bid crosses an ask when it is willing to pay at least the ask.
pub fn bid_crosses(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order crosses a resting price on the opposite
/// side
pub fn incoming_crosses(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Bid => bid_crosses(incoming_price, resting_price),
        Side::Ask => bid_crosses(resting_price, incoming_price),
    }
}
