//! pagemark: keyset ("cursor") pagination over declared multi-column sorts.
//!
//! A [`Paginator`] declares named sorts over an application base query and
//! serves pages through an external [`QueryExecutor`]. Each page carries an
//! opaque cursor; resuming from it selects exactly the rows strictly after
//! the previous page's last row, tie-breaks and null placement included.

mod error;
mod executor;
mod page;
mod paginator;
mod registry;

pub use error::PaginateError;
pub use executor::{ExecutorError, PageQuery, QueryExecutor};
pub use page::Page;
pub use paginator::{PageRequest, Paginator};

// re-exported observability surface
pub use pagemark_core::obs;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{Page, PageRequest, Paginator, QueryExecutor};
    pub use pagemark_core::prelude::*;
}
