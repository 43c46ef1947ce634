//! Recovery — Rebuild book state from the snapshot files
//!
//! Parses both active-order CSVs into per-side order lists in file
//! order (which is book iteration order, so replay restores price-time
//! priority by pushing rows back in sequence). Corruption is row-local:
//! a malformed row is recorded and skipped, and every remaining row
//! still loads. A missing file is a cold start, not an error.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A row that failed to parse during recovery.
///
/// Kept for diagnostics; the row itself is dropped from the restored
/// book and will disappear from the snapshot at the next rewrite.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub file: PathBuf,
    pub line_number: usize,
    pub detail: String,
}

/// The outcome of loading both snapshot files.
#[derive(Debug)]
pub struct RecoveredOrders {
    /// Bid rows in file order (best-first, FIFO within a level).
    pub bids: Vec<Order>,
    /// Ask rows in file order.
    pub asks: Vec<Order>,
    /// Rows dropped as malformed.
    pub skipped: Vec<SkippedRow>,
    /// Highest order id seen across both sides, if any row loaded.
    pub max_order_id: Option<OrderId>,
}

impl RecoveredOrders {
    /// Total restored resting orders.
    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }
}

/// Load both active-order snapshot files.
pub fn load_active_orders(
    bids_path: &Path,
    asks_path: &Path,
) -> Result<RecoveredOrders, RecoveryError> {
    let mut skipped = Vec::new();
    let bids = load_side(bids_path, Side::Bid, &mut skipped)?;
    let asks = load_side(asks_path, Side::Ask, &mut skipped)?;

    let max_order_id = bids.iter().chain(asks.iter()).map(|o| o.id).max();

    info!(
        bids = bids.len(),
        asks = asks.len(),
        skipped = skipped.len(),
        "active orders recovered"
    );

    Ok(RecoveredOrders {
        bids,
        asks,
        skipped,
        max_order_id,
    })
}

/// Load one side's file; the file determines the side of every row.
fn load_side(
    path: &Path,
    side: Side,
    skipped: &mut Vec<SkippedRow>,
) -> Result<Vec<Order>, RecoveryError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no snapshot file, starting fresh");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut orders = Vec::new();
    // Line 1 is the header
    for (idx, line) in contents.lines().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        match parse_row(line, side) {
            Ok(order) => orders.push(order),
            Err(detail) => {
                warn!(path = %path.display(), line_number = idx + 1, %detail, "skipping malformed row");
                skipped.push(SkippedRow {
                    file: path.to_path_buf(),
                    line_number: idx + 1,
                    detail,
                });
            }
        }
    }
    Ok(orders)
}

/// Parse one `OrderID,Price,Quantity,FilledQuantity,Timestamp` row.
fn parse_row(line: &str, side: Side) -> Result<Order, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 5 {
        return Err(format!("expected 5 fields, got {}", fields.len()));
    }

    let id: u64 = fields[0].parse().map_err(|_| "bad order id".to_string())?;
    let price: u64 = fields[1].parse().map_err(|_| "bad price".to_string())?;
    let quantity: u64 = fields[2].parse().map_err(|_| "bad quantity".to_string())?;
    let filled: u64 = fields[3]
        .parse()
        .map_err(|_| "bad filled quantity".to_string())?;
    let timestamp: i64 = fields[4].parse().map_err(|_| "bad timestamp".to_string())?;

    if id == 0 {
        return Err("order id must be positive".to_string());
    }
    if price == 0 {
        return Err("price must be positive".to_string());
    }
    if quantity == 0 {
        return Err("quantity must be positive".to_string());
    }
    // A fully filled row cannot rest; treat it as corrupt rather than
    // restore an order that violates the book's no-zero-remaining rule.
    if filled >= quantity {
        return Err(format!(
            "filled quantity {} leaves nothing resting of {}",
            filled, quantity
        ));
    }

    Ok(Order {
        id: OrderId::from_u64(id),
        side,
        price: Price::from_u64(price),
        quantity: Quantity::from_u64(quantity),
        filled_quantity: Quantity::from_u64(filled),
        timestamp,
    })
}

// ── Tests ───────────────────────────────────────────────────────────
