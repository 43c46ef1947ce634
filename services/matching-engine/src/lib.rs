//! Matching Engine Service
//!
//! Single-symbol limit order matching engine with price-time priority
//! and durable CSV state. The engine is single-threaded and
//! synchronous: every public operation runs to completion before the
//! next begins, and a restart reconstructs an equivalent book from the
//! snapshot files.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Trades strike at the resting order's price
//! - No resting order with zero remaining quantity
//! - The order index and the book queues always agree
//! - Best bid below best ask whenever both sides are populated

pub mod book;
pub mod engine;
pub mod events;
pub mod matching;
pub mod time;

pub use engine::{EngineConfig, EngineError, MatchingEngine, TopOfBook};
pub use events::{EventCategory, EventLog};
