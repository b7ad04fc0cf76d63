use crate::{
    cursor::BoundaryValues,
    error::{ConfigurationError, InvalidCursorError},
    order::{OrderDirection, OrderTerm},
    predicate::Predicate,
    sort::{BoundaryChain, FieldAccess, FieldPath, SortDescriptor},
    value::{Float64, Value},
};
use proptest::prelude::*;
use serde_json::json;
use std::cmp::Ordering;

fn chain(descriptors: Vec<SortDescriptor>) -> BoundaryChain {
    BoundaryChain::compile(&descriptors).expect("test chain should compile")
}

fn boundary(values: Vec<Value>) -> BoundaryValues {
    BoundaryValues::from(values)
}

// Reference evaluation of an emitted predicate over one JSON row, using the
// same null semantics the executor contract assumes: any comparison with a
// null operand is false, null membership is decided only by the null checks.
fn eval(predicate: &Predicate, row: &serde_json::Value) -> bool {
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
                    crate::predicate::CompareOp::Eq => ordering == Ordering::Equal,
                    crate::predicate::CompareOp::Gt => ordering == Ordering::Greater,
                    crate::predicate::CompareOp::Lt => ordering == Ordering::Less,
                },
                None => false,
            }
        }
        Predicate::IsNull { column } => lookup(row, column).is_null(),
        Predicate::IsNotNull { column } => !lookup(row, column).is_null(),
    }
}

fn lookup(row: &serde_json::Value, column: &str) -> Value {
    row.value_at(&FieldPath::from_key(column)).unwrap_or(Value::Null)
}

// Reference comparator over emitted order terms. Within one node the flag
// term has already separated null from non-null rows, so the value term
// treats any null pairing as equal.
fn row_cmp(order: &[OrderTerm], left: &serde_json::Value, right: &serde_json::Value) -> Ordering {
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

// Assert that the boundary built from sorted_rows[k] selects exactly the
// rows strictly after position k.
fn assert_partition(chain: &BoundaryChain, sorted_rows: &[serde_json::Value]) {
    for (k, row) in sorted_rows.iter().enumerate() {
        let values = chain
            .extract_boundary(row)
            .expect("dataset rows should extract");
        let predicate = chain
            .apply_boundary(&values)
            .expect("extracted boundary should apply");

        for (i, candidate) in sorted_rows.iter().enumerate() {
            let selected = eval(&predicate, candidate);
            assert_eq!(
                selected,
                i > k,
                "boundary at row {k} misclassified row {i} under {predicate:?}"
            );
        }
    }
}

#[test]
fn build_rejects_an_empty_chain() {
    let err = BoundaryChain::build(vec![]).expect_err("empty chain must fail");

    assert_eq!(err, ConfigurationError::EmptyChain);
}

#[test]
fn compile_propagates_descriptor_normalization_failures() {
    let err = BoundaryChain::compile(&[SortDescriptor::new("a.b.c")])
        .expect_err("malformed identifier must fail compilation");

    assert!(matches!(
        err,
        ConfigurationError::InvalidColumnIdentifier { .. }
    ));
}

#[test]
fn order_terms_emit_one_term_per_node_without_nullables() {
    let chain = chain(vec![
        SortDescriptor::new("role"),
        SortDescriptor::new("id").kind("integer").direction("desc"),
    ]);

    assert!(!chain.any_nullable());
    assert_eq!(
        chain.order_terms(),
        vec![
            OrderTerm::Column {
                column: "role".to_string(),
                direction: OrderDirection::Asc,
            },
            OrderTerm::Column {
                column: "id".to_string(),
                direction: OrderDirection::Desc,
            },
        ]
    );
}

#[test]
fn order_terms_emit_flag_then_value_per_node_with_any_nullable() {
    let chain = chain(vec![
        SortDescriptor::new("score")
            .kind("float")
            .nullable(true)
            .direction("desc-nulls-last"),
        SortDescriptor::new("id").kind("integer"),
    ]);

    assert!(chain.any_nullable());
    assert_eq!(
        chain.order_terms(),
        vec![
            OrderTerm::NullFlag {
                column: "score".to_string(),
                direction: OrderDirection::Asc,
            },
            OrderTerm::Column {
                column: "score".to_string(),
                direction: OrderDirection::Desc,
            },
            OrderTerm::NullFlag {
                column: "id".to_string(),
                direction: OrderDirection::Desc,
            },
            OrderTerm::Column {
                column: "id".to_string(),
                direction: OrderDirection::Asc,
            },
        ]
    );
}

#[test]
fn tie_break_boundary_builds_the_nested_keyset_disjunction() {
    let chain = chain(vec![
        SortDescriptor::new("role"),
        SortDescriptor::new("first_name"),
        SortDescriptor::new("last_name"),
        SortDescriptor::new("id").kind("integer"),
    ]);

    let predicate = chain
        .apply_boundary(&boundary(vec![
            Value::Text("admin".to_string()),
            Value::Text("Dude".to_string()),
            Value::Text("Bro".to_string()),
            Value::Int(3),
        ]))
        .expect("boundary should apply");

    let expected = Predicate::or(vec![
        Predicate::gt("role", Value::Text("admin".to_string())),
        Predicate::and(vec![
            Predicate::eq("role", Value::Text("admin".to_string())),
            Predicate::or(vec![
                Predicate::gt("first_name", Value::Text("Dude".to_string())),
                Predicate::and(vec![
                    Predicate::eq("first_name", Value::Text("Dude".to_string())),
                    Predicate::or(vec![
                        Predicate::gt("last_name", Value::Text("Bro".to_string())),
                        Predicate::and(vec![
                            Predicate::eq("last_name", Value::Text("Bro".to_string())),
                            Predicate::gt("id", Value::Int(3)),
                        ]),
                    ]),
                ]),
            ]),
        ]),
    ]);

    assert_eq!(predicate, expected);
}

#[test]
fn single_column_non_null_boundary_is_a_bare_comparison() {
    let chain = chain(vec![SortDescriptor::new("id").kind("integer")]);

    let predicate = chain
        .apply_boundary(&boundary(vec![Value::Int(7)]))
        .expect("boundary should apply");

    assert_eq!(predicate, Predicate::gt("id", Value::Int(7)));
}

#[test]
fn null_boundary_without_tail_nulls_last_selects_nothing() {
    let chain = chain(vec![
        SortDescriptor::new("score")
            .kind("float")
            .nullable(true)
            .direction("desc-nulls-last"),
    ]);

    let predicate = chain
        .apply_boundary(&boundary(vec![Value::Null]))
        .expect("null boundary should apply");

    assert_eq!(predicate, Predicate::False);
}

#[test]
fn null_boundary_without_tail_nulls_first_selects_all_non_null_rows() {
    for direction in ["asc", "desc"] {
        let chain = chain(vec![
            SortDescriptor::new("score")
                .kind("float")
                .nullable(true)
                .direction(direction),
        ]);

        let predicate = chain
            .apply_boundary(&boundary(vec![Value::Null]))
            .expect("null boundary should apply");

        assert_eq!(predicate, Predicate::is_not_null("score"));
    }
}

#[test]
fn null_boundary_with_tail_partitions_by_the_null_class() {
    let descriptors = |direction: &str| {
        vec![
            SortDescriptor::new("score")
                .kind("float")
                .nullable(true)
                .direction(direction),
            SortDescriptor::new("id").kind("integer"),
        ]
    };

    // Nulls first: later null rows via the tail, plus every non-null row.
    let nulls_first = chain(descriptors("asc"))
        .apply_boundary(&boundary(vec![Value::Null, Value::Int(5)]))
        .expect("boundary should apply");
    assert_eq!(
        nulls_first,
        Predicate::or(vec![
            Predicate::and(vec![
                Predicate::is_null("score"),
                Predicate::gt("id", Value::Int(5)),
            ]),
            Predicate::is_not_null("score"),
        ])
    );

    // Nulls last: only later members of the null class remain.
    let nulls_last = chain(descriptors("desc-nulls-last"))
        .apply_boundary(&boundary(vec![Value::Null, Value::Int(5)]))
        .expect("boundary should apply");
    assert_eq!(
        nulls_last,
        Predicate::and(vec![
            Predicate::is_null("score"),
            Predicate::gt("id", Value::Int(5)),
        ])
    );
}

#[test]
fn non_null_boundary_on_nullable_nulls_last_column_admits_the_null_class() {
    let no_tail = chain(vec![
        SortDescriptor::new("score")
            .kind("float")
            .nullable(true)
            .direction("desc-nulls-last"),
    ]);
    let predicate = no_tail
        .apply_boundary(&boundary(vec![Value::Float(Float64::new(1.5))]))
        .expect("boundary should apply");
    assert_eq!(
        predicate,
        Predicate::or(vec![
            Predicate::lt("score", Value::Float(Float64::new(1.5))),
            Predicate::is_null("score"),
        ])
    );

    let with_tail = chain(vec![
        SortDescriptor::new("score")
            .kind("float")
            .nullable(true)
            .direction("desc-nulls-last"),
        SortDescriptor::new("id").kind("integer"),
    ]);
    let predicate = with_tail
        .apply_boundary(&boundary(vec![
            Value::Float(Float64::new(1.5)),
            Value::Int(7),
        ]))
        .expect("boundary should apply");
    assert_eq!(
        predicate,
        Predicate::or(vec![
            Predicate::lt("score", Value::Float(Float64::new(1.5))),
            Predicate::and(vec![
                Predicate::eq("score", Value::Float(Float64::new(1.5))),
                Predicate::gt("id", Value::Int(7)),
            ]),
            Predicate::is_null("score"),
        ])
    );
}

#[test]
fn non_null_boundary_on_nullable_nulls_first_column_keeps_the_bare_inequality() {
    let chain = chain(vec![
        SortDescriptor::new("score").kind("float").nullable(true),
    ]);

    let predicate = chain
        .apply_boundary(&boundary(vec![Value::Float(Float64::new(1.5))]))
        .expect("boundary should apply");

    // Nulls sorted first and were consumed before any non-null boundary; the
    // inequality's implicit null exclusion is exactly right.
    assert_eq!(
        predicate,
        Predicate::gt("score", Value::Float(Float64::new(1.5)))
    );
}

#[test]
fn apply_boundary_rejects_arity_mismatches() {
    let chain = chain(vec![
        SortDescriptor::new("role"),
        SortDescriptor::new("id").kind("integer"),
    ]);

    let err = chain
        .apply_boundary(&boundary(vec![Value::Text("admin".to_string())]))
        .expect_err("short boundary must fail");

    assert_eq!(
        err,
        InvalidCursorError::BoundaryArity {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn boundary_validation_uses_the_cursor_taxonomy() {
    let chain = chain(vec![SortDescriptor::new("role")]);

    let err = chain
        .apply_boundary(&boundary(vec![Value::Null]))
        .expect_err("null on non-nullable column must fail");

    assert_eq!(
        err,
        InvalidCursorError::UnexpectedNull {
            column: "role".to_string()
        }
    );
}

#[test]
fn extraction_and_consumption_of_the_same_defect_split_by_taxonomy() {
    let chain = chain(vec![SortDescriptor::new("role")]);

    // Server-side row with a null in a non-nullable column: config bug.
    let row = json!({ "role": null });
    let config_err = chain
        .extract_boundary(&row)
        .expect_err("extraction must fail in configuration taxonomy");
    assert_eq!(
        config_err,
        ConfigurationError::UnexpectedNull {
            column: "role".to_string()
        }
    );

    // The same null arriving via a client cursor: invalid cursor.
    let cursor_err = chain
        .apply_boundary(&boundary(vec![Value::Null]))
        .expect_err("consumption must fail in cursor taxonomy");
    assert_eq!(
        cursor_err,
        InvalidCursorError::UnexpectedNull {
            column: "role".to_string()
        }
    );
}

#[test]
fn extract_boundary_projects_one_value_per_node_in_chain_order() {
    let chain = chain(vec![
        SortDescriptor::new("role"),
        SortDescriptor::new("score").kind("float").nullable(true),
        SortDescriptor::new("id").kind("integer"),
    ]);

    let row = json!({ "role": "admin", "score": null, "id": 3 });
    let values = chain.extract_boundary(&row).expect("row should extract");

    assert_eq!(
        values.values(),
        &[
            Value::Text("admin".to_string()),
            Value::Null,
            Value::Int(3),
        ]
    );
}

#[test]
fn round_trip_boundary_partitions_a_tied_dataset_exactly() {
    let chain = chain(vec![
        SortDescriptor::new("role"),
        SortDescriptor::new("first_name"),
        SortDescriptor::new("id").kind("integer"),
    ]);

    let mut rows = vec![
        json!({ "role": "admin", "first_name": "Dude", "id": 3 }),
        json!({ "role": "admin", "first_name": "Dude", "id": 1 }),
        json!({ "role": "admin", "first_name": "Bro", "id": 2 }),
        json!({ "role": "user", "first_name": "Abe", "id": 4 }),
        json!({ "role": "user", "first_name": "Abe", "id": 5 }),
        json!({ "role": "guest", "first_name": "Zed", "id": 6 }),
    ];
    let order = chain.order_terms();
    rows.sort_by(|left, right| row_cmp(&order, left, right));

    assert_partition(&chain, &rows);
}

#[test]
fn round_trip_boundary_partitions_across_null_classes() {
    for direction in ["asc", "desc", "desc-nulls-last"] {
        let chain = chain(vec![
            SortDescriptor::new("score")
                .kind("float")
                .nullable(true)
                .direction(direction),
            SortDescriptor::new("id").kind("integer"),
        ]);

        let mut rows = vec![
            json!({ "score": null, "id": 1 }),
            json!({ "score": null, "id": 2 }),
            json!({ "score": 0.5, "id": 3 }),
            json!({ "score": 0.5, "id": 4 }),
            json!({ "score": 2.0, "id": 5 }),
            json!({ "score": -1.0, "id": 6 }),
        ];
        let order = chain.order_terms();
        rows.sort_by(|left, right| row_cmp(&order, left, right));

        assert_partition(&chain, &rows);
    }
}

proptest! {
    // For arbitrary tied datasets, the boundary built from any row selects
    // exactly the rows strictly after it in chain order.
    #[test]
    fn boundary_partition_holds_for_arbitrary_grouped_rows(
        groups in prop::collection::vec(0..4i64, 1..32),
    ) {
        let chain = chain(vec![
            SortDescriptor::new("group").kind("integer"),
            SortDescriptor::new("id").kind("integer"),
        ]);

        let mut rows: Vec<serde_json::Value> = groups
            .iter()
            .enumerate()
            .map(|(id, group)| json!({ "group": group, "id": id as i64 }))
            .collect();
        let order = chain.order_terms();
        rows.sort_by(|left, right| row_cmp(&order, left, right));

        assert_partition(&chain, &rows);
    }
}
