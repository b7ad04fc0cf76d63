use crate::{cursor::ArmorError, value::Value};
use thiserror::Error as ThisError;

///
/// ConfigurationError
///
/// Malformed descriptor declarations and server-extracted row values that
/// fail their own declared constraints. Always a developer or deployment
/// defect, never a client-input problem.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigurationError {
    #[error("unknown sort kind tag: '{tag}'")]
    UnknownKind { tag: String },

    #[error("unknown sort direction tag: '{tag}'")]
    UnknownDirection { tag: String },

    /// Column identifiers allow a single optional qualifier: `column` or
    /// `table.column`.
    #[error("invalid column identifier: '{identifier}'")]
    InvalidColumnIdentifier { identifier: String },

    #[error("invalid extraction path: '{path}'")]
    InvalidPath { path: String },

    /// A deterministic order requires at least one sort column.
    #[error("a boundary chain requires at least one sort column")]
    EmptyChain,

    #[error("page limit must be at least 1")]
    ZeroLimit,

    #[error("extracted value for column '{column}' is null but the column is not nullable")]
    UnexpectedNull { column: String },

    #[error("extracted value for column '{column}' is not a valid {expected}: {value:?}")]
    KindMismatch {
        column: String,
        expected: &'static str,
        value: Value,
    },

    #[error("extracted value for column '{column}' was rejected: {message}")]
    RuleRejected { column: String, message: String },

    #[error("failed to encode continuation cursor: {reason}")]
    CursorEncode { reason: String },
}

///
/// InvalidCursorError
///
/// A client-supplied cursor failed structural decoding, an
/// identity/consistency check, or value validation during consumption.
/// Signals bad, stale, or tampered client input.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum InvalidCursorError {
    /// Cursor token armor could not be decoded.
    #[error("cursor token could not be decoded: {source}")]
    Armor {
        token: String,
        #[source]
        source: ArmorError,
    },

    /// Cursor bytes did not parse as a cursor payload.
    #[error("cursor payload is malformed: {reason}")]
    Malformed { token: String, reason: String },

    #[error("unsupported cursor version: {version}")]
    UnsupportedVersion { version: u8 },

    /// Cursor payload decoded to something other than a map.
    #[error("cursor payload must be a map, found {found}")]
    PayloadShape { found: String },

    #[error("cursor field '{field}' is missing")]
    MissingField { field: &'static str },

    #[error("cursor field '{field}' has the wrong shape: found {found}")]
    FieldShape { field: &'static str, found: String },

    /// Cursor was minted by a different paginator.
    #[error("cursor belongs to a different query: expected '{expected}', found '{found}'")]
    DifferentQuery { expected: String, found: String },

    /// Cursor was minted for a different declared sort.
    #[error("cursor belongs to a different sort: expected '{expected}', found '{found}'")]
    DifferentSort { expected: String, found: String },

    /// Cursor was minted under different semantic arguments.
    #[error("cursor args hash mismatch: expected {expected}, found {found:?}")]
    ArgsHashMismatch {
        expected: String,
        found: Option<String>,
    },

    /// Boundary width does not match the compiled chain width.
    #[error("cursor boundary arity mismatch: expected {expected}, found {found}")]
    BoundaryArity { expected: usize, found: usize },

    #[error("cursor value for column '{column}' is null but the column is not nullable")]
    UnexpectedNull { column: String },

    #[error("cursor value for column '{column}' is not a valid {expected}: {value:?}")]
    KindMismatch {
        column: String,
        expected: &'static str,
        value: Value,
    },

    #[error("cursor value for column '{column}' was rejected: {message}")]
    RuleRejected { column: String, message: String },
}

///
/// UnknownSortError
/// Requested sort name is not declared; detected lazily on first use.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown sort '{sort}' for paginator '{query_id}'")]
pub struct UnknownSortError {
    pub query_id: String,
    pub sort: String,
}
