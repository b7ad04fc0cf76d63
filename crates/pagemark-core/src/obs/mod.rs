//! Observability: ephemeral in-memory pagination counters.
//!
//! Pagination logic records through [`record`] only; the counter state is
//! never read on a hot path.

mod metrics;

pub use metrics::{PageEvent, PaginationOps, metrics_report, metrics_reset, record};
