//! Module: cursor
//! Responsibility: the opaque continuation token protocol: armor, payload
//! codec, boundary value carrier, and the argument fingerprint.
//! Does not own: identity/consistency checks against a paginator; those
//! belong to the orchestrator.

mod armor;
mod boundary;
mod fingerprint;
mod token;

pub use armor::ArmorError;
pub use boundary::BoundaryValues;
pub use fingerprint::args_fingerprint;
pub use token::Cursor;
