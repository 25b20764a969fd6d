use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::RecordId;

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Issue a new record id.
///
/// Ids keep the millisecond-timestamp format of existing data, but the value is
/// bumped past the last issued one so two calls within the same millisecond
/// still get distinct ids for the lifetime of the process.
pub fn next_id() -> RecordId {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_ISSUED
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    RecordId::new(now.max(previous + 1).to_string())
}
