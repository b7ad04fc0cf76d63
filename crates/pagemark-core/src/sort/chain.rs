use crate::{
    cursor::BoundaryValues,
    error::{ConfigurationError, InvalidCursorError},
    obs::{self, PageEvent},
    order::OrderTerm,
    predicate::Predicate,
    sort::{
        descriptor::{NormalizedSortDescriptor, SortDescriptor},
        path::FieldAccess,
    },
    value::Value,
};

///
/// BoundaryChain
///
/// Compiled, immutable multi-column sort. The head-plus-tail recursion of
/// the boundary algebra is expressed as an index into the descriptor array:
/// suffixes strictly shrink, so no linked structure is needed.
///

#[derive(Clone, Debug)]
pub struct BoundaryChain {
    descriptors: Vec<NormalizedSortDescriptor>,
    any_nullable: bool,
}

impl BoundaryChain {
    /// Build a chain from normalized descriptors. An empty chain is invalid:
    /// a deterministic order requires at least one column.
    pub fn build(descriptors: Vec<NormalizedSortDescriptor>) -> Result<Self, ConfigurationError> {
        if descriptors.is_empty() {
            return Err(ConfigurationError::EmptyChain);
        }

        let any_nullable = descriptors.iter().any(NormalizedSortDescriptor::nullable);

        obs::record(PageEvent::ChainCompiled);

        Ok(Self {
            descriptors,
            any_nullable,
        })
    }

    /// Normalize raw descriptors and build the chain in one step.
    pub fn compile(raw: &[SortDescriptor]) -> Result<Self, ConfigurationError> {
        let descriptors = raw
            .iter()
            .map(SortDescriptor::normalize)
            .collect::<Result<Vec<_>, _>>()?;

        Self::build(descriptors)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Chains are never empty; kept for API symmetry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn descriptors(&self) -> &[NormalizedSortDescriptor] {
        &self.descriptors
    }

    /// True iff any descriptor in the chain is nullable.
    #[must_use]
    pub const fn any_nullable(&self) -> bool {
        self.any_nullable
    }

    /// Ordering instructions for the executor.
    ///
    /// Without nullable columns this is one value term per chain position.
    /// With any nullable column every position emits two terms in fixed
    /// sequence, the is-null placement flag and then the value term, so null
    /// placement is pinned explicitly instead of relying on engine defaults.
    #[must_use]
    pub fn order_terms(&self) -> Vec<OrderTerm> {
        let per_node = if self.any_nullable { 2 } else { 1 };
        let mut terms = Vec::with_capacity(self.descriptors.len() * per_node);

        for descriptor in &self.descriptors {
            if self.any_nullable {
                terms.push(OrderTerm::NullFlag {
                    column: descriptor.column().to_string(),
                    direction: descriptor.null_order(),
                });
            }
            terms.push(OrderTerm::Column {
                column: descriptor.column().to_string(),
                direction: descriptor.order(),
            });
        }

        terms
    }

    /// Project one row onto the sort key, in chain order. Values are
    /// validated in Configuration context: a failure here is a config bug,
    /// not bad client input.
    pub fn extract_boundary<R: FieldAccess>(
        &self,
        row: &R,
    ) -> Result<BoundaryValues, ConfigurationError> {
        let values = self
            .descriptors
            .iter()
            .map(|descriptor| descriptor.extract(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BoundaryValues::new(values))
    }

    /// Build the predicate selecting exactly the rows strictly after the
    /// boundary row in chain order. Boundary values arrive from a client
    /// cursor, so validation failures surface in the Cursor taxonomy.
    pub fn apply_boundary(&self, boundary: &BoundaryValues) -> Result<Predicate, InvalidCursorError> {
        if boundary.len() != self.descriptors.len() {
            return Err(InvalidCursorError::BoundaryArity {
                expected: self.descriptors.len(),
                found: boundary.len(),
            });
        }

        self.boundary_from(0, boundary.values())
    }

    // Recursive keyset predicate for the chain suffix starting at `index`.
    // `values` holds exactly the suffix's boundary values; arity is enforced
    // at the apply_boundary entry.
    fn boundary_from(&self, index: usize, values: &[Value]) -> Result<Predicate, InvalidCursorError> {
        let descriptor = &self.descriptors[index];
        let value = &values[0];

        descriptor.validate_cursor(value)?;

        let tail = if index + 1 < self.descriptors.len() {
            Some(self.boundary_from(index + 1, &values[1..])?)
        } else {
            None
        };

        if value.is_null() {
            Ok(Self::null_boundary(descriptor, tail))
        } else {
            Ok(Self::value_boundary(descriptor, value, tail))
        }
    }

    // Null boundary: nulls form a single equivalence class, and a plain
    // inequality against null is false for every row, so placement decides
    // everything. Rows tied with the boundary (other nulls) only qualify
    // through the tail; non-null rows are included wholesale exactly when
    // they sort after the null class.
    fn null_boundary(descriptor: &NormalizedSortDescriptor, tail: Option<Predicate>) -> Predicate {
        let column = descriptor.column();
        let nulls_first = descriptor.direction().nulls_first();

        match tail {
            None if nulls_first => Predicate::is_not_null(column),
            // Nulls-last: the null class is terminal and nothing follows it.
            None => Predicate::False,
            Some(tail) => {
                let within_nulls = Predicate::and(vec![Predicate::is_null(column), tail]);

                if nulls_first {
                    Predicate::or(vec![within_nulls, Predicate::is_not_null(column)])
                } else {
                    within_nulls
                }
            }
        }
    }

    // Non-null boundary: the standard keyset disjunction. Rows strictly past
    // the boundary on this column qualify unconditionally; ties qualify only
    // through the tail. Nullable nulls-last columns additionally admit the
    // whole null class, which the inequality alone would exclude.
    fn value_boundary(
        descriptor: &NormalizedSortDescriptor,
        value: &Value,
        tail: Option<Predicate>,
    ) -> Predicate {
        let column = descriptor.column();
        let mut arms = vec![Predicate::compare(
            column,
            descriptor.operator(),
            value.clone(),
        )];

        if let Some(tail) = tail {
            arms.push(Predicate::and(vec![
                Predicate::eq(column, value.clone()),
                tail,
            ]));
        }

        if descriptor.nullable() && !descriptor.direction().nulls_first() {
            arms.push(Predicate::is_null(column));
        }

        if arms.len() == 1 {
            arms.swap_remove(0)
        } else {
            Predicate::or(arms)
        }
    }
}
