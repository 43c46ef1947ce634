//! Trade Journal — Append-only trade log
//!
//! One CSV row per executed trade, flushed before the append returns so
//! the log never lags a completed operation. The file is never
//! rewritten: the header goes in once when the file is created empty,
//! and every later run appends below the existing rows.
//!
//! # Row format
//! ```text
//! TradeID,BuyOrderID,SellOrderID,Price,Quantity,Timestamp
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use types::trade::Trade;

/// Column header, written once when the journal file is empty.
pub const TRADES_HEADER: &str = "TradeID,BuyOrderID,SellOrderID,Price,Quantity,Timestamp";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Trade Journal ───────────────────────────────────────────────────

/// Append-only writer for the trade log.
///
/// Opening the journal scans any existing rows so that trade ids stay
/// monotonic across restarts; the id after the last persisted one is
/// handed to the match executor at engine construction.
pub struct TradeJournal {
    path: PathBuf,
    writer: BufWriter<File>,
    next_trade_id: u64,
    max_order_id: u64,
}

impl TradeJournal {
    /// Open (or create) the journal at `path`, writing the header if the
    /// file is new or empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JournalError> {
        let path = path.into();
        let (next_trade_id, max_order_id) = Self::scan_existing_rows(&path)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = BufWriter::new(file);
        if needs_header {
            writeln!(writer, "{}", TRADES_HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer,
            next_trade_id,
            max_order_id,
        })
    }

    /// The id the next minted trade should carry.
    pub fn next_trade_id(&self) -> u64 {
        self.next_trade_id
    }

    /// The highest order id referenced by any journalled trade, or 0.
    ///
    /// A fully filled aggressor leaves no snapshot row, so its id can
    /// outrank everything resting; the engine folds this in when it
    /// seeds `next_order_id`, keeping order ids unused across restarts.
    pub fn max_order_id(&self) -> u64 {
        self.max_order_id
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one trade row and flush it to the OS before returning.
    pub fn append(&mut self, trade: &Trade) -> Result<(), JournalError> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{}",
            trade.id,
            trade.bid_order_id,
            trade.ask_order_id,
            trade.price,
            trade.quantity,
            trade.timestamp
        )?;
        self.writer.flush()?;
        self.next_trade_id = self.next_trade_id.max(trade.id.as_u64() + 1);
        self.max_order_id = self
            .max_order_id
            .max(trade.bid_order_id.as_u64())
            .max(trade.ask_order_id.as_u64());
        Ok(())
    }

    /// Flush buffered rows and fsync the file (used at teardown).
    pub fn sync(&mut self) -> Result<(), JournalError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Scan existing rows for the next trade id and the highest order
    /// id referenced.
    ///
    /// A row that does not parse is skipped; the scan exists to seed
    /// the counters, not to validate history.
    fn scan_existing_rows(path: &Path) -> Result<(u64, u64), JournalError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((1, 0)),
            Err(e) => return Err(e.into()),
        };

        let mut max_trade_id: u64 = 0;
        let mut max_order_id: u64 = 0;
        for line in contents.lines().skip(1) {
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let trade_id = fields.next().and_then(|f| f.parse::<u64>().ok());
            let bid_id = fields.next().and_then(|f| f.parse::<u64>().ok());
            let ask_id = fields.next().and_then(|f| f.parse::<u64>().ok());
            match (trade_id, bid_id, ask_id) {
                (Some(trade_id), Some(bid_id), Some(ask_id)) => {
                    max_trade_id = max_trade_id.max(trade_id);
                    max_order_id = max_order_id.max(bid_id).max(ask_id);
                }
                _ => warn!(path = %path.display(), line, "unparseable trade row during id scan"),
            }
        }
        Ok((max_trade_id + 1, max_order_id))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
