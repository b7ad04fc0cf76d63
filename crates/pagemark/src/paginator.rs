use crate::{
    error::PaginateError,
    executor::{PageQuery, QueryExecutor},
    page::Page,
    registry,
};
use pagemark_core::{
    cursor::{BoundaryValues, Cursor, args_fingerprint},
    error::{ConfigurationError, InvalidCursorError, UnknownSortError},
    obs::{self, PageEvent},
    sort::{BoundaryChain, SortDescriptor},
    value::Value,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

///
/// Paginator
///
/// A named, cursor-paginated query surface: stable query identity, declared
/// sorts, and the argument-fingerprint policy. Declared sorts compile
/// lazily on first use and stay cached for the life of the process.
///

#[derive(Clone, Debug)]
pub struct Paginator {
    query_id: String,
    sorts: BTreeMap<String, Vec<SortDescriptor>>,
    args_dependent: bool,
    transient_args: BTreeSet<String>,
}

impl Paginator {
    #[must_use]
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            sorts: BTreeMap::new(),
            args_dependent: false,
            transient_args: BTreeSet::new(),
        }
    }

    /// Declare one named sort. Descriptors accept bare column names as
    /// shorthand; validation happens lazily when the sort is first used.
    #[must_use]
    pub fn sort(
        mut self,
        name: impl Into<String>,
        descriptors: impl IntoIterator<Item = impl Into<SortDescriptor>>,
    ) -> Self {
        self.sorts.insert(
            name.into(),
            descriptors.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Declare that results depend on call arguments: cursors carry an
    /// argument fingerprint and reject reuse under different arguments.
    #[must_use]
    pub const fn args_dependent(mut self) -> Self {
        self.args_dependent = true;
        self
    }

    /// Exclude one argument from the fingerprint; it is declared
    /// non-semantic and must not invalidate cursors.
    #[must_use]
    pub fn transient_arg(mut self, name: impl Into<String>) -> Self {
        self.transient_args.insert(name.into());
        self
    }

    #[must_use]
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// Serve one page: resolve the compiled chain, consume the incoming
    /// cursor, delegate execution, and mint the continuation state.
    pub fn paginate<X: QueryExecutor>(
        &self,
        executor: &X,
        request: &PageRequest,
    ) -> Result<Page<X::Row>, PaginateError> {
        if request.limit() == 0 {
            return Err(ConfigurationError::ZeroLimit.into());
        }

        let chain = self.resolve_chain(request.sort())?;

        let fingerprint = self
            .args_dependent
            .then(|| args_fingerprint(request.args(), &self.transient_args));

        let boundary_values = match request.cursor() {
            Some(token) => self.consume_cursor(token, request.sort(), fingerprint.as_deref())?,
            None => None,
        };

        let filter = match &boundary_values {
            Some(values) => Some(chain.apply_boundary(values)?),
            None => None,
        };

        let query = PageQuery::new(chain.order_terms(), filter, request.limit());
        let rows = executor.fetch_page(&query)?;

        // Continuation state: the last returned row, or the incoming
        // boundary unchanged when the page came back empty.
        let next_values = match rows.last() {
            Some(last) => Some(chain.extract_boundary(last)?),
            None => boundary_values,
        };

        let remaining = if rows.len() as u64 == u64::from(request.limit()) {
            Self::count_remaining(executor, &chain, next_values.as_ref())?
        } else {
            // A partial page proves nothing is left; the second query is
            // provably unnecessary.
            obs::record(PageEvent::CountQuerySkipped);
            0
        };

        let mut cursor = Cursor::new(self.query_id.clone(), request.sort());
        if let Some(fingerprint) = fingerprint {
            cursor = cursor.with_fingerprint(fingerprint);
        }
        if let Some(values) = next_values {
            cursor = cursor.with_values(values);
        }
        let next_cursor = cursor.encode()?;

        obs::record(PageEvent::PageServed {
            rows: rows.len() as u64,
        });

        Ok(Page::new(rows, remaining, next_cursor))
    }

    // Second, separate executor call issued only after a full page: count
    // everything past the new boundary.
    fn count_remaining<X: QueryExecutor>(
        executor: &X,
        chain: &BoundaryChain,
        next_values: Option<&BoundaryValues>,
    ) -> Result<u64, PaginateError> {
        let Some(values) = next_values else {
            // A full page always has a last row; a zero-limit request never
            // gets this far.
            return Ok(0);
        };

        let after = chain.apply_boundary(values)?;

        obs::record(PageEvent::CountQueryIssued);
        let remaining = executor.count_after(&after)?;

        Ok(remaining)
    }

    fn resolve_chain(&self, sort: &str) -> Result<Arc<BoundaryChain>, PaginateError> {
        let Some(descriptors) = self.sorts.get(sort) else {
            return Err(UnknownSortError {
                query_id: self.query_id.clone(),
                sort: sort.to_string(),
            }
            .into());
        };

        let chain = registry::resolve_chain(&self.query_id, sort, || {
            BoundaryChain::compile(descriptors)
        })?;

        Ok(chain)
    }

    // Decode an incoming token and enforce the identity/consistency checks
    // the codec itself does not own.
    fn consume_cursor(
        &self,
        token: &str,
        sort: &str,
        fingerprint: Option<&str>,
    ) -> Result<Option<BoundaryValues>, InvalidCursorError> {
        let cursor = Cursor::decode(token)?;

        if cursor.query_id() != self.query_id {
            obs::record(PageEvent::CursorRejected);
            return Err(InvalidCursorError::DifferentQuery {
                expected: self.query_id.clone(),
                found: cursor.query_id().to_string(),
            });
        }

        if cursor.sort_id() != sort {
            obs::record(PageEvent::CursorRejected);
            return Err(InvalidCursorError::DifferentSort {
                expected: sort.to_string(),
                found: cursor.sort_id().to_string(),
            });
        }

        if let Some(expected) = fingerprint
            && cursor.args_fingerprint() != Some(expected)
        {
            obs::record(PageEvent::CursorRejected);
            return Err(InvalidCursorError::ArgsHashMismatch {
                expected: expected.to_string(),
                found: cursor.args_fingerprint().map(str::to_string),
            });
        }

        Ok(cursor.into_values())
    }
}

///
/// PageRequest
///
/// One pagination call: limit, sort name, optional incoming cursor, and the
/// call's named arguments.
///

#[derive(Clone, Debug)]
pub struct PageRequest {
    limit: u32,
    sort: String,
    cursor: Option<String>,
    args: Vec<(String, Value)>,
}

impl PageRequest {
    #[must_use]
    pub fn new(limit: u32, sort: impl Into<String>) -> Self {
        Self {
            limit,
            sort: sort.into(),
            cursor: None,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, token: impl Into<String>) -> Self {
        self.cursor = Some(token.into());
        self
    }

    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn sort(&self) -> &str {
        &self.sort
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    #[must_use]
    pub fn args(&self) -> &[(String, Value)] {
        &self.args
    }
}
