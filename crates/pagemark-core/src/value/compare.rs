use crate::value::{Float64, Value};
use std::cmp::Ordering;

// Strict same-kind comparison; the only cross-variant pairing is the
// Int/Float numeric promotion used by float-kinded columns.
pub(super) fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => Some(promote(*a).cmp(b)),
        (Value::Float(a), Value::Int(b)) => Some(a.cmp(&promote(*b))),

        _ => None,
    }
}

// Values beyond 2^53 lose precision here, matching the executor-side
// float widening these columns already opted into.
#[expect(clippy::cast_precision_loss)]
const fn promote(value: i64) -> Float64 {
    Float64::new(value as f64)
}
