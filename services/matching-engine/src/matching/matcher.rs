//! Price-time priority matching walk
//!
//! Matches an incoming order against the opposite side of the book,
//! best price first, FIFO within a level. The walk mutates resting
//! orders' fill state and removes completed makers from both the queue
//! and the order index; the residual of the incoming order is NOT
//! inserted here — resting the remainder is the coordinator's call.

use tracing::debug;
use types::order::Order;
use types::trade::Trade;

use crate::book::{AskBook, BidBook, OrderIndex};
use crate::matching::crossing;
use crate::matching::executor::MatchExecutor;
use crate::time;

/// Match an incoming bid against the ask book
///
/// Walks ask levels from the lowest price upward, stopping when the
/// book runs out, the incoming order fills, or the next level is priced
/// above the bid.
pub fn match_bid(
    incoming: &mut Order,
    asks: &mut AskBook,
    index: &mut OrderIndex,
    executor: &mut MatchExecutor,
) -> Vec<Trade> {
    let mut trades = Vec::new();

    while !incoming.is_filled() {
        let Some((ask_price, level)) = asks.best_ask_level_mut() else {
            break;
        };
        if !crossing::bid_crosses(incoming.price, ask_price) {
            break;
        }

        while !incoming.is_filled() {
            let (resting_id, resting_remaining) = match level.front() {
                Some(resting) => (resting.id, resting.remaining()),
                None => break,
            };
            let quantity = incoming.remaining().min(resting_remaining);

            // Strike at the resting order's price
            trades.push(executor.execute_trade(
                incoming.id,
                resting_id,
                ask_price,
                quantity,
                time::unix_timestamp_secs(),
            ));

            incoming.add_fill(quantity);
            let fill = level.fill_front(quantity);
            if let Some(completed) = fill.completed {
                debug!(order_id = %completed.id, "ask order filled and removed");
                index.remove(&completed.id);
            }
        }

        asks.prune_best_if_empty();
    }

    trades
}

/// Match an incoming ask against the bid book
///
/// Walks bid levels from the highest price downward, stopping when the
/// book runs out, the incoming order fills, or the next level is priced
/// below the ask.
pub fn match_ask(
    incoming: &mut Order,
    bids: &mut BidBook,
    index: &mut OrderIndex,
    executor: &mut MatchExecutor,
) -> Vec<Trade> {
    let mut trades = Vec::new();

    while !incoming.is_filled() {
        let Some((bid_price, level)) = bids.best_bid_level_mut() else {
            break;
        };
        if !crossing::bid_crosses(bid_price, incoming.price) {
            break;
        }

        while !incoming.is_filled() {
            let (resting_id, resting_remaining) = match level.front() {
                Some(resting) => (resting.id, resting.remaining()),
                None => break,
            };
            let quantity = incoming.remaining().min(resting_remaining);

            trades.push(executor.execute_trade(
                resting_id,
                incoming.id,
                bid_price,
                quantity,
                time::unix_timestamp_secs(),
            ));

            incoming.add_fill(quantity);
            let fill = level.fill_front(quantity);
            if let Some(completed) = fill.completed {
                debug!(order_id = %completed.id, "bid order filled and removed");
                index.remove(&completed.id);
            }
        }

        bids.prune_best_if_empty();
    }

    trades
}
