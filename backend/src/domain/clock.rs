//! Monotonic timestamp source for ledger mutations.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use mockable::Clock;

/// Wall clock clamped to never run backwards.
///
/// Mutation timestamps must be non-decreasing in the order mutations are
/// applied, but the underlying wall clock may step backwards (NTP
/// adjustments, coarse test clocks). `MonotonicClock` remembers the latest
/// stamp it handed out, at millisecond precision, and never returns an
/// earlier one.
pub struct MonotonicClock {
    inner: Arc<dyn Clock>,
    last_millis: AtomicI64,
}

impl MonotonicClock {
    /// Wrap an injectable wall clock.
    #[must_use]
    pub fn new(inner: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            last_millis: AtomicI64::new(i64::MIN),
        }
    }

    /// Current timestamp, clamped to be at least every previously returned
    /// stamp.
    pub fn now(&self) -> DateTime<Utc> {
        let wall = self.inner.utc();
        let wall_millis = wall.timestamp_millis();
        let previous = self.last_millis.fetch_max(wall_millis, Ordering::AcqRel);
        if previous <= wall_millis {
            return wall;
        }
        DateTime::<Utc>::from_timestamp_millis(previous).unwrap_or(wall)
    }
}

impl std::fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("last_millis", &self.last_millis)
            .finish_non_exhaustive()
    }
}
