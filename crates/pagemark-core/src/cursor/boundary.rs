use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// BoundaryValues
///
/// A specific row's projection onto the sort key: one value per chain
/// position, in chain order. Produced by boundary extraction, carried inside
/// cursors, and consumed to build the next page's predicate.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct BoundaryValues {
    values: Vec<Value>,
}

impl BoundaryValues {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for BoundaryValues {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
