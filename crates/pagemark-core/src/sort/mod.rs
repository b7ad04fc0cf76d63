//! Module: sort
//! Responsibility: descriptor normalization and the boundary chain: the
//! recursive algebra turning a declared multi-column sort into ordering
//! instructions and boundary predicates.
//! Does not own: cursor wire protocol, executor contracts, orchestration.

mod chain;
mod descriptor;
mod path;
mod rule;
mod validate;

#[cfg(test)]
mod tests;

pub use chain::BoundaryChain;
pub use descriptor::{NormalizedSortDescriptor, SortDescriptor, SortDirection, SortKind};
pub use path::{FieldAccess, FieldPath, PathSegment};
pub use rule::{RuleOutcome, ValueRule};
pub use validate::{ValidationError, ValueContext};
