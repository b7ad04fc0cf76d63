use std::sync::atomic::{AtomicU64, Ordering};

///
/// PageEvent
/// Instrumentation events recorded by the pagination runtime.
///

#[derive(Clone, Copy, Debug)]
pub enum PageEvent {
    ChainCompiled,
    CursorDecoded,
    CursorRejected,
    PageServed { rows: u64 },
    CountQueryIssued,
    CountQuerySkipped,
}

///
/// PaginationOps
/// Point-in-time snapshot of the pagination counters.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PaginationOps {
    pub chains_compiled: u64,
    pub cursors_decoded: u64,
    pub cursors_rejected: u64,
    pub pages_served: u64,
    pub rows_returned: u64,
    pub count_queries_issued: u64,
    pub count_queries_skipped: u64,
}

struct Counters {
    chains_compiled: AtomicU64,
    cursors_decoded: AtomicU64,
    cursors_rejected: AtomicU64,
    pages_served: AtomicU64,
    rows_returned: AtomicU64,
    count_queries_issued: AtomicU64,
    count_queries_skipped: AtomicU64,
}

static COUNTERS: Counters = Counters {
    chains_compiled: AtomicU64::new(0),
    cursors_decoded: AtomicU64::new(0),
    cursors_rejected: AtomicU64::new(0),
    pages_served: AtomicU64::new(0),
    rows_returned: AtomicU64::new(0),
    count_queries_issued: AtomicU64::new(0),
    count_queries_skipped: AtomicU64::new(0),
};

/// Record one pagination event.
pub fn record(event: PageEvent) {
    match event {
        PageEvent::ChainCompiled => bump(&COUNTERS.chains_compiled, 1),
        PageEvent::CursorDecoded => bump(&COUNTERS.cursors_decoded, 1),
        PageEvent::CursorRejected => bump(&COUNTERS.cursors_rejected, 1),
        PageEvent::PageServed { rows } => {
            bump(&COUNTERS.pages_served, 1);
            bump(&COUNTERS.rows_returned, rows);
        }
        PageEvent::CountQueryIssued => bump(&COUNTERS.count_queries_issued, 1),
        PageEvent::CountQuerySkipped => bump(&COUNTERS.count_queries_skipped, 1),
    }
}

/// Snapshot the current counter values.
#[must_use]
pub fn metrics_report() -> PaginationOps {
    PaginationOps {
        chains_compiled: COUNTERS.chains_compiled.load(Ordering::Relaxed),
        cursors_decoded: COUNTERS.cursors_decoded.load(Ordering::Relaxed),
        cursors_rejected: COUNTERS.cursors_rejected.load(Ordering::Relaxed),
        pages_served: COUNTERS.pages_served.load(Ordering::Relaxed),
        rows_returned: COUNTERS.rows_returned.load(Ordering::Relaxed),
        count_queries_issued: COUNTERS.count_queries_issued.load(Ordering::Relaxed),
        count_queries_skipped: COUNTERS.count_queries_skipped.load(Ordering::Relaxed),
    }
}

/// Reset every counter to zero.
pub fn metrics_reset() {
    COUNTERS.chains_compiled.store(0, Ordering::Relaxed);
    COUNTERS.cursors_decoded.store(0, Ordering::Relaxed);
    COUNTERS.cursors_rejected.store(0, Ordering::Relaxed);
    COUNTERS.pages_served.store(0, Ordering::Relaxed);
    COUNTERS.rows_returned.store(0, Ordering::Relaxed);
    COUNTERS.count_queries_issued.store(0, Ordering::Relaxed);
    COUNTERS.count_queries_skipped.store(0, Ordering::Relaxed);
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{PageEvent, metrics_report, record};

    // Counters are process-global and other tests record through them, so
    // assertions are delta-based.
    #[test]
    fn record_accumulates_event_counters() {
        let before = metrics_report();

        record(PageEvent::PageServed { rows: 3 });
        record(PageEvent::CursorDecoded);
        record(PageEvent::CountQuerySkipped);

        let after = metrics_report();
        assert!(after.pages_served >= before.pages_served + 1);
        assert!(after.rows_returned >= before.rows_returned + 3);
        assert!(after.cursors_decoded >= before.cursors_decoded + 1);
        assert!(after.count_queries_skipped >= before.count_queries_skipped + 1);
    }
}
