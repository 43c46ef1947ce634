//! Matching engine core
//!
//! Main coordinator: sequences the matcher, book, order index, and
//! persistence for the public operations, and owns the id counters.
//! Single-threaded by contract — every operation runs to completion
//! before the next begins.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use persistence::journal::{JournalError, TradeJournal};
use persistence::recovery::{load_active_orders, RecoveryError};
use persistence::snapshot::{SnapshotError, SnapshotStore};
use types::errors::OrderError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook, OrderIndex};
use crate::events::{EventCategory, EventLog};
use crate::matching::executor::MatchExecutor;
use crate::matching::matcher;
use crate::time;

// ── Configuration ───────────────────────────────────────────────────

/// File locations for the engine's durable state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the three CSV files; created if absent.
    pub data_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn bids_path(&self) -> PathBuf {
        self.data_dir.join("bids.csv")
    }

    pub fn asks_path(&self) -> PathBuf {
        self.data_dir.join("asks.csv")
    }

    pub fn trades_path(&self) -> PathBuf {
        self.data_dir.join("trades.csv")
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// Top-level engine error
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Recovery error: {0}")]
    Recovery(#[from] RecoveryError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Top of book ─────────────────────────────────────────────────────

/// Best level on each side: price plus the head (oldest) order there.
#[derive(Debug, Clone)]
pub struct TopOfBook {
    pub best_bid: Option<(Price, Order)>,
    pub best_ask: Option<(Price, Order)>,
}

// ── Engine ──────────────────────────────────────────────────────────

/// The matching engine
///
/// Owns the two book sides, the order index, both id counters, and the
/// durable files. Constructing one replays the active-order snapshots;
/// dropping one exports them a final time.
pub struct MatchingEngine {
    bids: BidBook,
    asks: AskBook,
    index: OrderIndex,
    executor: MatchExecutor,
    next_order_id: u64,
    journal: TradeJournal,
    snapshots: SnapshotStore,
    events: Arc<dyn EventLog>,
}

impl MatchingEngine {
    /// Open the engine, replaying durable state from `config.data_dir`.
    ///
    /// Any error here is fatal to construction; malformed snapshot ROWS
    /// are not errors — they are skipped, reported to the event log,
    /// and dropped from the next rewrite.
    pub fn open(config: &EngineConfig, events: Arc<dyn EventLog>) -> Result<Self, EngineError> {
        events.log(EventCategory::System, "order book initializing");
        fs::create_dir_all(&config.data_dir)?;

        let journal = TradeJournal::open(config.trades_path())?;
        let snapshots = SnapshotStore::new(config.bids_path(), config.asks_path());

        let recovered = load_active_orders(&config.bids_path(), &config.asks_path())?;
        for row in &recovered.skipped {
            events.log(
                EventCategory::Error,
                &format!(
                    "skipped corrupt row at {}:{} ({})",
                    row.file.display(),
                    row.line_number,
                    row.detail
                ),
            );
        }

        // A filled aggressor leaves no snapshot row but may carry the
        // highest id ever issued; the journal remembers it.
        let max_resting_id = recovered.max_order_id.map(|id| id.as_u64()).unwrap_or(0);
        let next_order_id = max_resting_id.max(journal.max_order_id()) + 1;
        let restored = recovered.order_count();

        let mut bids = BidBook::new();
        let mut asks = AskBook::new();
        let mut index = OrderIndex::new();
        for order in recovered.bids {
            index.insert(order.id, Side::Bid, order.price);
            bids.insert(order);
        }
        for order in recovered.asks {
            index.insert(order.id, Side::Ask, order.price);
            asks.insert(order);
        }

        let executor = MatchExecutor::new(journal.next_trade_id());

        info!(
            restored,
            next_order_id,
            next_trade_id = executor.next_trade_id(),
            "matching engine ready"
        );
        events.log(
            EventCategory::System,
            &format!("order book initialized, {restored} resting orders restored"),
        );

        Ok(Self {
            bids,
            asks,
            index,
            executor,
            next_order_id,
            journal,
            snapshots,
            events,
        })
    }

    /// Submit a limit order: match what crosses, rest the remainder.
    ///
    /// Returns the trades struck, in strike order.
    pub fn place(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Vec<Trade>, EngineError> {
        if price.is_zero() {
            self.events
                .log(EventCategory::Error, "rejected order: price must be positive");
            return Err(OrderError::InvalidPrice("must be positive".to_string()).into());
        }
        if quantity.is_zero() {
            self.events.log(
                EventCategory::Error,
                "rejected order: quantity must be positive",
            );
            return Err(OrderError::InvalidQuantity("must be positive".to_string()).into());
        }

        let id = OrderId::from_u64(self.next_order_id);
        self.next_order_id += 1;
        let timestamp = time::unix_timestamp_secs();
        let mut incoming = Order::new(id, side, price, quantity, timestamp);

        self.events.log(
            EventCategory::Order,
            &format!("placing {side} order {id} for {quantity} @ {price}"),
        );

        let trades = match side {
            Side::Bid => matcher::match_bid(
                &mut incoming,
                &mut self.asks,
                &mut self.index,
                &mut self.executor,
            ),
            Side::Ask => matcher::match_ask(
                &mut incoming,
                &mut self.bids,
                &mut self.index,
                &mut self.executor,
            ),
        };

        for trade in &trades {
            self.events.log(
                EventCategory::Trade,
                &format!(
                    "matched {} units at price {} (bid {} ask {})",
                    trade.quantity, trade.price, trade.bid_order_id, trade.ask_order_id
                ),
            );
            if let Err(e) = self.journal.append(trade) {
                self.events.log(
                    EventCategory::Error,
                    &format!("trade journal append failed, in-memory book is ahead of durable state: {e}"),
                );
                return Err(e.into());
            }
        }

        if incoming.is_filled() {
            self.events.log(
                EventCategory::Order,
                &format!("{side} order {id} fully filled on entry"),
            );
        } else {
            debug!(order_id = %id, remaining = %incoming.remaining(), "resting residual");
            self.index.insert(id, side, price);
            match side {
                Side::Bid => self.bids.insert(incoming),
                Side::Ask => self.asks.insert(incoming),
            }
        }

        self.write_snapshot()?;
        Ok(trades)
    }

    /// Cancel a resting order by id.
    ///
    /// Ids that are not resting — never seen, already filled, already
    /// cancelled — all answer `NotFound`; the engine keeps no record to
    /// tell them apart.
    pub fn cancel(&mut self, id: OrderId) -> Result<(), EngineError> {
        let Some((side, price)) = self.index.lookup(&id) else {
            self.events.log(
                EventCategory::Error,
                &format!("cancel failed, order {id} not found"),
            );
            return Err(OrderError::NotFound { order_id: id }.into());
        };

        let removed = match side {
            Side::Bid => self.bids.remove(&id, price),
            Side::Ask => self.asks.remove(&id, price),
        };
        // The index said it was resting; the queue must agree
        debug_assert!(removed.is_some(), "index and book disagree on {id}");
        if removed.is_none() {
            self.events.log(
                EventCategory::Error,
                &format!("cancel failed, order {id} missing from its book queue"),
            );
            return Err(OrderError::NotFound { order_id: id }.into());
        }

        self.index.remove(&id);
        self.events
            .log(EventCategory::Order, &format!("cancelled order {id}"));
        self.write_snapshot()?;
        Ok(())
    }

    /// Top of book on both sides; pure read.
    pub fn snapshot_top(&self) -> TopOfBook {
        TopOfBook {
            best_bid: self
                .bids
                .best_bid()
                .map(|(price, order)| (price, order.clone())),
            best_ask: self
                .asks
                .best_ask()
                .map(|(price, order)| (price, order.clone())),
        }
    }

    /// Derived status of a RESTING order.
    ///
    /// Orders that have left the book have no record and answer
    /// `NotFound`, like any other unknown id.
    pub fn order_status(&self, id: OrderId) -> Result<OrderStatus, EngineError> {
        let Some((side, price)) = self.index.lookup(&id) else {
            self.events.log(
                EventCategory::Error,
                &format!("status query failed, order {id} not found"),
            );
            return Err(OrderError::NotFound { order_id: id }.into());
        };
        let order = match side {
            Side::Bid => self.bids.get(&id, price),
            Side::Ask => self.asks.get(&id, price),
        };
        order
            .map(|o| o.resting_status())
            .ok_or_else(|| OrderError::NotFound { order_id: id }.into())
    }

    /// Number of resting orders across both sides.
    pub fn resting_order_count(&self) -> usize {
        self.index.len()
    }

    /// Rewrite both active-order files from the live book.
    fn write_snapshot(&self) -> Result<(), EngineError> {
        if let Err(e) = self
            .snapshots
            .write_active_orders(self.bids.orders(), self.asks.orders())
        {
            self.events.log(
                EventCategory::Error,
                &format!("snapshot write failed, durable state is stale: {e}"),
            );
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for MatchingEngine {
    /// Final export of active orders on every exit path.
    fn drop(&mut self) {
        self.events.log(
            EventCategory::System,
            "order book shutting down, exporting active orders",
        );
        if let Err(e) = self
            .snapshots
            .write_active_orders(self.bids.orders(), self.asks.orders())
        {
            error!(error = %e, "final snapshot export failed");
            self.events.log(
                EventCategory::Error,
                &format!("final snapshot export failed: {e}"),
            );
        }
        if let Err(e) = self.journal.sync() {
            error!(error = %e, "trade journal sync failed at shutdown");
        }
        self.events.log(EventCategory::System, "export complete");
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventLog;
    use tempfile::TempDir;

    fn new_engine(tmp: &TempDir) -> (MatchingEngine, Arc<MemoryEventLog>) {
        let events = Arc::new(MemoryEventLog::new());
        let config = EngineConfig::new(tmp.path());
        let engine = MatchingEngine::open(&config, events.clone()).unwrap();
        (engine, events)
    }

    fn place(
        engine: &mut MatchingEngine,
        side: Side,
        price: u64,
        qty: u64,
    ) -> Vec<Trade> {
        engine
            .place(side, Price::from_u64(price), Quantity::from_u64(qty))
            .unwrap()
    }

    #[test]
    fn test_zero_price_rejected_without_state_change() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, events) = new_engine(&tmp);

        let result = engine.place(Side::Bid, Price::from_u64(0), Quantity::from_u64(5));
        assert!(matches!(
            result,
            Err(EngineError::Order(OrderError::InvalidPrice(_)))
        ));
        assert_eq!(engine.resting_order_count(), 0);
        assert_eq!(events.count(EventCategory::Error), 1);

        // The rejected call burned no id
        let trades = place(&mut engine, Side::Bid, 100, 5);
        assert!(trades.is_empty());
        let top = engine.snapshot_top();
        assert_eq!(top.best_bid.unwrap().1.id, OrderId::from_u64(1));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, _) = new_engine(&tmp);

        let result = engine.place(Side::Ask, Price::from_u64(100), Quantity::from_u64(0));
        assert!(matches!(
            result,
            Err(EngineError::Order(OrderError::InvalidQuantity(_)))
        ));
    }

    #[test]
    fn test_place_rests_and_persists() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, events) = new_engine(&tmp);

        let trades = place(&mut engine, Side::Bid, 100, 10);
        assert!(trades.is_empty());
        assert_eq!(engine.resting_order_count(), 1);
        assert_eq!(events.count(EventCategory::Order), 1);

        let bids = std::fs::read_to_string(tmp.path().join("bids.csv")).unwrap();
        assert_eq!(bids.lines().count(), 2);
        assert!(bids.lines().nth(1).unwrap().starts_with("1,100,10,0,"));
    }

    #[test]
    fn test_cross_emits_trade_events_and_journal_rows() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, events) = new_engine(&tmp);

        place(&mut engine, Side::Ask, 100, 5);
        let trades = place(&mut engine, Side::Bid, 100, 5);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Price::from_u64(100));
        assert_eq!(events.count(EventCategory::Trade), 1);
        assert_eq!(engine.resting_order_count(), 0);

        let journal = std::fs::read_to_string(tmp.path().join("trades.csv")).unwrap();
        assert_eq!(journal.lines().count(), 2); // header + one trade
        assert!(journal.lines().nth(1).unwrap().starts_with("1,2,1,100,5,"));
    }

    #[test]
    fn test_cancel_unknown_id_not_found() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, events) = new_engine(&tmp);

        let result = engine.cancel(OrderId::from_u64(7));
        assert!(matches!(
            result,
            Err(EngineError::Order(OrderError::NotFound { .. }))
        ));
        assert_eq!(events.count(EventCategory::Error), 1);
    }

    #[test]
    fn test_cancel_removes_from_book_and_files() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, _) = new_engine(&tmp);

        place(&mut engine, Side::Bid, 100, 10);
        engine.cancel(OrderId::from_u64(1)).unwrap();

        assert_eq!(engine.resting_order_count(), 0);
        assert!(engine.snapshot_top().best_bid.is_none());

        let bids = std::fs::read_to_string(tmp.path().join("bids.csv")).unwrap();
        assert_eq!(bids.lines().count(), 1); // header only

        // A second cancel of the same id is NotFound
        assert!(matches!(
            engine.cancel(OrderId::from_u64(1)),
            Err(EngineError::Order(OrderError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_cancel_of_filled_order_not_found() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, _) = new_engine(&tmp);

        place(&mut engine, Side::Ask, 100, 5);
        place(&mut engine, Side::Bid, 100, 5); // fills order 1

        assert!(matches!(
            engine.cancel(OrderId::from_u64(1)),
            Err(EngineError::Order(OrderError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_order_status_derivation() {
        let tmp = TempDir::new().unwrap();
        let (mut engine, _) = new_engine(&tmp);

        place(&mut engine, Side::Ask, 100, 10);
        assert_eq!(
            engine.order_status(OrderId::from_u64(1)).unwrap(),
            OrderStatus::Open
        );

        place(&mut engine, Side::Bid, 100, 4);
        assert_eq!(
            engine.order_status(OrderId::from_u64(1)).unwrap(),
            OrderStatus::Partial
        );

        place(&mut engine, Side::Bid, 100, 6);
        assert!(engine.order_status(OrderId::from_u64(1)).is_err());
    }

    #[test]
    fn test_reopen_restores_book_and_counters() {
        let tmp = TempDir::new().unwrap();
        let config = EngineConfig::new(tmp.path());

        {
            let (mut engine, _) = new_engine(&tmp);
            place(&mut engine, Side::Bid, 100, 10);
            place(&mut engine, Side::Ask, 105, 7);
            place(&mut engine, Side::Ask, 100, 4); // trades 4 against bid 1
        }

        let events = Arc::new(MemoryEventLog::new());
        let mut engine = MatchingEngine::open(&config, events).unwrap();

        assert_eq!(engine.resting_order_count(), 2);
        let top = engine.snapshot_top();
        let (bid_price, bid) = top.best_bid.unwrap();
        assert_eq!(bid_price, Price::from_u64(100));
        assert_eq!(bid.filled_quantity, Quantity::from_u64(4));
        assert_eq!(top.best_ask.unwrap().0, Price::from_u64(105));

        // New ids continue past everything restored
        let trades = place(&mut engine, Side::Bid, 105, 7);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id.as_u64(), 2); // journal had one trade
        assert_eq!(trades[0].bid_order_id, OrderId::from_u64(4));
    }

    #[test]
    fn test_corrupt_snapshot_row_skipped_on_open() {
        let tmp = TempDir::new().unwrap();
        let config = EngineConfig::new(tmp.path());

        {
            let (mut engine, _) = new_engine(&tmp);
            place(&mut engine, Side::Bid, 100, 10);
            place(&mut engine, Side::Bid, 99, 5);
        }

        // Corrupt the second row by hand
        let bids_path = tmp.path().join("bids.csv");
        let contents = std::fs::read_to_string(&bids_path).unwrap();
        let mangled: String = contents
            .lines()
            .map(|l| {
                if l.starts_with("2,") {
                    "2,not-a-price,5,0,0".to_string()
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(&bids_path, mangled + "\n").unwrap();

        let events = Arc::new(MemoryEventLog::new());
        let engine = MatchingEngine::open(&config, events.clone()).unwrap();

        assert_eq!(engine.resting_order_count(), 1);
        assert_eq!(events.count(EventCategory::Error), 1);
    }

    #[test]
    fn test_drop_exports_final_snapshot() {
        let tmp = TempDir::new().unwrap();
        let events: Arc<MemoryEventLog> = Arc::new(MemoryEventLog::new());
        let config = EngineConfig::new(tmp.path());

        {
            let mut engine = MatchingEngine::open(&config, events.clone()).unwrap();
            place(&mut engine, Side::Ask, 102, 3);
        }

        let asks = std::fs::read_to_string(tmp.path().join("asks.csv")).unwrap();
        assert_eq!(asks.lines().count(), 2);
        let entries = events.entries();
        assert!(entries
            .iter()
            .any(|(c, m)| *c == EventCategory::System && m.contains("export complete")));
    }
}
