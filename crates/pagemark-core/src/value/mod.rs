mod compare;
mod float;

pub use float::Float64;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// Value
///
/// Scalar carried through boundary values, cursor payloads, and predicate
/// leaves.
///
/// Null → the column's value is absent (i.e., SQL NULL).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Date(NaiveDate),
    Float(Float64),
    Int(i64),
    Null,
    Text(String),
}

impl Value {
    /// Returns true if the value is Null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value is Text.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Variant name used by error diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }

    /// Stable canonical variant tag used by fingerprint encodings.
    #[must_use]
    pub(crate) const fn canonical_tag(&self) -> u8 {
        match self {
            Self::Bool(_) => 0x01,
            Self::Date(_) => 0x02,
            Self::Float(_) => 0x03,
            Self::Int(_) => 0x04,
            Self::Null => 0x05,
            Self::Text(_) => 0x06,
        }
    }

    /// Strict comparator for orderable values of compatible kinds.
    ///
    /// Returns `None` for mismatched variants; `Null` never participates.
    /// `Int` and `Float` compare numerically, since float columns accept
    /// lossless integer widening.
    #[must_use]
    pub fn strict_order_cmp(left: &Self, right: &Self) -> Option<Ordering> {
        compare::strict_order_cmp(left, right)
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    NaiveDate => Date,
    bool      => Bool,
    f32       => Float,
    f64       => Float,
    Float64   => Float,
    i8        => Int,
    i16       => Int,
    i32       => Int,
    i64       => Int,
    &str      => Text,
    String    => Text,
}

///
/// TESTS
///
