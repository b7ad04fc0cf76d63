use pagemark_core::{order::OrderTerm, predicate::Predicate, sort::FieldAccess};
use thiserror::Error as ThisError;

///
/// ExecutorError
///
/// Opaque failure surfaced unchanged from the backing query executor.
/// Retry, timeout, and cancellation policy belong to the executor, never to
/// this layer.
///

#[derive(Debug, ThisError)]
#[error(transparent)]
pub struct ExecutorError(Box<dyn std::error::Error + Send + Sync>);

impl ExecutorError {
    #[must_use]
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

///
/// PageQuery
///
/// One executor request: ordering instructions, the optional boundary
/// filter, and the row limit. The executor composes these onto the
/// application's base query.
///

#[derive(Clone, Debug)]
pub struct PageQuery {
    order: Vec<OrderTerm>,
    boundary: Option<Predicate>,
    limit: u32,
}

impl PageQuery {
    #[must_use]
    pub const fn new(order: Vec<OrderTerm>, boundary: Option<Predicate>, limit: u32) -> Self {
        Self {
            order,
            boundary,
            limit,
        }
    }

    #[must_use]
    pub fn order(&self) -> &[OrderTerm] {
        &self.order
    }

    #[must_use]
    pub const fn boundary(&self) -> Option<&Predicate> {
        self.boundary.as_ref()
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

///
/// QueryExecutor
///
/// The external relational executor this crate delegates to. The
/// orchestrator issues the two calls strictly in sequence: the
/// remaining-count query may depend on executor-side metadata resolved by
/// the row fetch, and sequencing lets a short page skip the count entirely.
///

pub trait QueryExecutor {
    type Row: FieldAccess;

    /// Fetch up to `query.limit()` rows, ordered by `query.order()` and
    /// filtered by `query.boundary()` on top of the base query.
    fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Self::Row>, ExecutorError>;

    /// Count the rows of the base query matching `boundary`.
    fn count_after(&self, boundary: &Predicate) -> Result<u64, ExecutorError>;
}
