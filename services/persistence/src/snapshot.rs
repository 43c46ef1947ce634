//! Active-Order Snapshots — Rewrite-on-mutation book state
//!
//! The two snapshot files (one per side) always mirror the live book:
//! after every mutating operation they are rewritten in full, rows in
//! book iteration order — best price first, FIFO within a level — so a
//! replay that pushes rows back in file order reconstructs both price
//! and time priority.
//!
//! Each rewrite goes to a temporary file that is fsynced and renamed
//! over the previous snapshot, so a crash mid-write never leaves a torn
//! file behind.
//!
//! # Row format
//! ```text
//! OrderID,Price,Quantity,FilledQuantity,Timestamp
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use types::order::Order;

/// Column header for both active-order files.
pub const ORDERS_HEADER: &str = "OrderID,Price,Quantity,FilledQuantity,Timestamp";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Snapshot Store ──────────────────────────────────────────────────

/// Writer for the two active-order snapshot files.
pub struct SnapshotStore {
    bids_path: PathBuf,
    asks_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(bids_path: impl Into<PathBuf>, asks_path: impl Into<PathBuf>) -> Self {
        Self {
            bids_path: bids_path.into(),
            asks_path: asks_path.into(),
        }
    }

    pub fn bids_path(&self) -> &Path {
        &self.bids_path
    }

    pub fn asks_path(&self) -> &Path {
        &self.asks_path
    }

    /// Rewrite both snapshot files from the live book.
    ///
    /// The iterators must yield orders in book iteration order; the row
    /// order in the file IS the replay order.
    pub fn write_active_orders<'a>(
        &self,
        bids: impl Iterator<Item = &'a Order>,
        asks: impl Iterator<Item = &'a Order>,
    ) -> Result<(), SnapshotError> {
        Self::write_side(&self.bids_path, bids)?;
        Self::write_side(&self.asks_path, asks)?;
        Ok(())
    }

    /// Atomic rewrite of one side: write to tmp, fsync, rename.
    fn write_side<'a>(
        path: &Path,
        orders: impl Iterator<Item = &'a Order>,
    ) -> Result<(), SnapshotError> {
        let tmp_path = Self::tmp_path(path);

        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "{}", ORDERS_HEADER)?;
            for order in orders {
                writeln!(
                    writer,
                    "{},{},{},{},{}",
                    order.id, order.price, order.quantity, order.filled_quantity, order.timestamp
                )?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
