//! Ask (sell-side) order book
//!
//! Maintains ask orders keyed by price; best ask is the lowest price.
//! Mirror image of the bid book with the iteration direction flipped.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask side of the book
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    /// Price levels; iterated front-to-back for best-first order
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order, creating its price level if absent
    pub fn insert(&mut self, order: Order) {
        self.levels
            .entry(order.price)
            .or_insert_with(PriceLevel::new)
            .insert(order);
    }

    /// Remove an order, dropping its level if it empties
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// The best ask: lowest price and the head order at that level
    pub fn best_ask(&self) -> Option<(Price, &Order)> {
        self.levels
            .iter()
            .next()
            .and_then(|(price, level)| level.front().map(|order| (*price, order)))
    }

    /// The best ask price
    pub fn best_ask_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best ask level (the matcher's walk seam)
    pub(crate) fn best_ask_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
            .map(|(price, level)| (*price, level))
    }

    /// Drop the best level if it has emptied
    pub(crate) fn prune_best_if_empty(&mut self) {
        let empty_best = match self.levels.iter().next() {
            Some((price, level)) if level.is_empty() => *price,
            _ => return,
        };
        self.levels.remove(&empty_best);
    }

    /// Find a resting order by id at a known price
    pub fn get(&self, order_id: &OrderId, price: Price) -> Option<&Order> {
        self.levels.get(&price)?.get(order_id)
    }

    /// All resting orders in snapshot row order: best price first, FIFO
    /// within a level
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(|level| level.iter())
    }

    /// Top `depth` levels as (price, resting quantity) pairs
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.resting_quantity()))
            .collect()
    }

    /// Check if the ask book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(|l| l.order_count()).sum()
    }
}
