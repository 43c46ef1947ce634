//! Persistence & Replay Service
//!
//! Durable state for the matching engine, kept in three CSV files:
//! an append-only trade journal and two active-order snapshot files
//! (one per book side) that are rewritten after every mutation. On
//! startup, recovery parses the snapshot files back into orders,
//! skipping malformed rows, so a restart reconstructs an equivalent
//! book.
//!
//! The trade journal is authoritative history; the snapshots are the
//! live state. Neither file ever stores derived order status.

pub mod journal;
pub mod recovery;
pub mod snapshot;

pub use journal::{JournalError, TradeJournal};
pub use recovery::{load_active_orders, RecoveredOrders, RecoveryError, SkippedRow};
pub use snapshot::{SnapshotError, SnapshotStore};
