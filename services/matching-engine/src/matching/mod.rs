//! Matching logic module
//!
//! Implements the price-time priority matching algorithm.

pub mod crossing;
pub mod executor;
pub mod matcher;

pub use executor::MatchExecutor;
pub use matcher::{match_ask, match_bid};
