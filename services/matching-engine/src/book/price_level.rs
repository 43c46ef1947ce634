//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at a specific price point,
//! in strict arrival order. Insertion order is the sole time-priority
//! authority: nothing ever reorders a queue.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// A price level containing resting orders at a single price
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<Order>,
}

/// Outcome of filling the head order of a level
#[derive(Debug, Clone)]
pub struct FrontFill {
    /// The head order's id
    pub order_id: OrderId,
    /// The head order, removed from the queue, if the fill completed it
    pub completed: Option<Order>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Insert an order at the back of the queue (time priority)
    pub fn insert(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Peek at the front order without removing it
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Pop the front order from the queue
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Apply a fill to the front order, removing it when it completes
    ///
    /// # Panics
    /// Panics if the level is empty or the fill exceeds the head's
    /// remaining quantity.
    pub fn fill_front(&mut self, quantity: Quantity) -> FrontFill {
        let head = self
            .orders
            .front_mut()
            .expect("fill_front on empty price level");
        head.add_fill(quantity);
        let order_id = head.id;

        let completed = if head.is_filled() {
            self.orders.pop_front()
        } else {
            None
        };
        FrontFill {
            order_id,
            completed,
        }
    }

    /// Remove an order from the queue by id, preserving the order of
    /// the rest
    ///
    /// Returns the removed order, or None if the id is not at this
    /// level.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        self.orders.remove(position)
    }

    /// Find an order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == order_id)
    }

    /// Iterate the queue in time priority order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total unfilled quantity resting at this level
    pub fn resting_quantity(&self) -> Quantity {
        self.orders.iter().map(|o| o.remaining()).sum()
    }

    /// Number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}
