//! Time-derived id assignment

use chrono::Utc;

/// Millisecond-timestamp id, bumped past any id already in use.
///
/// Good enough for a single-process mock: ids stay unique and roughly
/// monotonic even when two records land in the same millisecond.
pub(crate) fn fresh_id(existing: impl Iterator<Item = i64>) -> i64 {
    let max_taken = existing.max().unwrap_or(0);
    Utc::now().timestamp_millis().max(max_taken + 1)
}
