//! In-memory reference executor for exercising the full pagination algebra
//! end-to-end: it interprets emitted order terms and boundary predicates
//! over `serde_json` rows with the null semantics the executor contract
//! assumes.

use pagemark::{ExecutorError, PageQuery, QueryExecutor};
use pagemark_core::{
    order::OrderTerm,
    predicate::{CompareOp, Predicate},
    sort::{FieldAccess, FieldPath},
    value::Value,
};
use std::cell::Cell;
use std::cmp::Ordering;

///
/// MemoryExecutor
///

pub struct MemoryExecutor {
    rows: Vec<serde_json::Value>,
    pub fetch_calls: Cell<u32>,
    pub count_calls: Cell<u32>,
}

impl MemoryExecutor {
    pub fn new(rows: Vec<serde_json::Value>) -> Self {
        Self {
            rows,
            fetch_calls: Cell::new(0),
            count_calls: Cell::new(0),
        }
    }
}

impl QueryExecutor for MemoryExecutor {
    type Row = serde_json::Value;

    fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Self::Row>, ExecutorError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);

        let mut rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .filter(|&row| query.boundary().is_none_or(|predicate| eval(predicate, row)))
            .cloned()
            .collect();
        rows.sort_by(|left, right| row_cmp(query.order(), left, right));
        rows.truncate(query.limit() as usize);

        Ok(rows)
    }

    fn count_after(&self, boundary: &Predicate) -> Result<u64, ExecutorError> {
        self.count_calls.set(self.count_calls.get() + 1);

        let count = self.rows.iter().filter(|&row| eval(boundary, row)).count();
        Ok(count as u64)
    }
}

///
/// FailingExecutor
/// Fails every call; exercises backend error passthrough.
///

pub struct FailingExecutor;

impl QueryExecutor for FailingExecutor {
    type Row = serde_json::Value;

    fn fetch_page(&self, _query: &PageQuery) -> Result<Vec<Self::Row>, ExecutorError> {
        Err(ExecutorError::new("backend offline"))
    }

    fn count_after(&self, _boundary: &Predicate) -> Result<u64, ExecutorError> {
        Err(ExecutorError::new("backend offline"))
    }
}

pub fn lookup(row: &serde_json::Value, column: &str) -> Value {
    row.value_at(&FieldPath::from_key(column)).unwrap_or(Value::Null)
}

// SQL-flavored evaluation: any comparison with a null operand is false; null
// membership is decided only by the explicit null checks.
pub fn eval(predicate: &Predicate, row: &serde_json::Value) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,
        Predicate::And(preds) => preds.iter().all(|p| eval(p, row)),
        Predicate::Or(preds) => preds.iter().any(|p| eval(p, row)),
        Predicate::Not(pred) => !eval(pred, row),
        Predicate::Compare(cmp) => {
            let left = lookup(row, &cmp.column);
            if left.is_null() || cmp.value.is_null() {
                return false;
            }

            match Value::strict_order_cmp(&left, &cmp.value) {
                Some(ordering) => match cmp.op {
                    CompareOp::Eq => ordering == Ordering::Equal,
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Lt => ordering == Ordering::Less,
                },
                None => false,
            }
        }
        Predicate::IsNull { column } => lookup(row, column).is_null(),
        Predicate::IsNotNull { column } => !lookup(row, column).is_null(),
    }
}

// Composite comparator over emitted order terms. The flag term separates
// null from non-null rows, so the value term treats null pairings as equal.
pub fn row_cmp(order: &[OrderTerm], left: &serde_json::Value, right: &serde_json::Value) -> Ordering {
    for term in order {
        let ordering = match term {
            OrderTerm::NullFlag { column, direction } => {
                let l = lookup(left, column).is_null();
                let r = lookup(right, column).is_null();
                direction.apply(l.cmp(&r))
            }
            OrderTerm::Column { column, direction } => {
                let l = lookup(left, column);
                let r = lookup(right, column);
                if l.is_null() || r.is_null() {
                    Ordering::Equal
                } else {
                    direction.apply(Value::strict_order_cmp(&l, &r).unwrap_or(Ordering::Equal))
                }
            }
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}
