//! Core algebra for pagemark: sort descriptor normalization, the boundary
//! chain recursion, the opaque cursor codec, and the executor-facing
//! predicate/order contract types.

// public exports are one module level down
pub mod cursor;
pub mod error;
pub mod obs;
pub mod order;
pub mod predicate;
pub mod sort;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cursor::{BoundaryValues, Cursor},
        order::{OrderDirection, OrderTerm},
        predicate::{CompareOp, Predicate},
        sort::{BoundaryChain, NormalizedSortDescriptor, SortDescriptor, SortDirection, SortKind},
        value::Value,
    };
}
