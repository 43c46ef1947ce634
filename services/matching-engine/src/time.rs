//! Wall-clock helper

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in whole seconds
///
/// Timestamps are informational; no engine logic depends on their
/// ordering, so plain wall-clock reads are fine here.
pub fn unix_timestamp_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_past_2020() {
        assert!(unix_timestamp_secs() > 1_577_836_800);
    }
}
