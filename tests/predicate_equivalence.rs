//! The indexed path and the full-scan path must be indistinguishable:
//! same row ids, same ascending order, for every operator, probe, and
//! index variant — before and after mutations.

mod common;

use proptest::prelude::*;
use sillydb::column::Column;
use sillydb::index::{ColumnIndex, IndexKind};
use sillydb::table::Selection;
use sillydb::value::{CmpOp, Kind, Value};

fn int_column(values: &[i64]) -> Column {
    let mut col = Column::new("v", Kind::Int);
    for &v in values {
        col.push(Value::Int(v));
    }
    col
}

fn op_strategy() -> impl Strategy<Value = CmpOp> {
    prop_oneof![
        Just(CmpOp::Less),
        Just(CmpOp::Equal),
        Just(CmpOp::Greater),
    ]
}

fn index_kind_strategy() -> impl Strategy<Value = IndexKind> {
    prop_oneof![Just(IndexKind::Hash), Just(IndexKind::Bst)]
}

proptest! {
    #[test]
    fn indexed_ints_match_scan(
        values in prop::collection::vec(-8i64..8, 0..64),
        probe in -9i64..9,
        op in op_strategy(),
        kind in index_kind_strategy(),
    ) {
        common::init_test_logging();
        let col = int_column(&values);
        let scan = col.matching_rows(&Value::Int(probe), op);
        let mut index = ColumnIndex::build(kind, 0, &col);
        prop_assert_eq!(index.rows_matching(&col, &Value::Int(probe), op), scan);
    }

    #[test]
    fn indexed_strings_match_scan(
        values in prop::collection::vec("[ab]{0,3}", 0..48),
        probe in "[ab]{0,3}",
        op in op_strategy(),
        kind in index_kind_strategy(),
    ) {
        common::init_test_logging();
        let mut col = Column::new("s", Kind::Str);
        for v in &values {
            col.push(Value::Str(v.clone()));
        }
        let probe = Value::Str(probe);
        let scan = col.matching_rows(&probe, op);
        let mut index = ColumnIndex::build(kind, 0, &col);
        prop_assert_eq!(index.rows_matching(&col, &probe, op), scan);
    }

    #[test]
    fn equivalence_survives_delete_and_append(
        values in prop::collection::vec(-5i64..5, 1..48),
        doomed in -5i64..5,
        appended in prop::collection::vec(-5i64..5, 0..8),
        probe in -6i64..6,
        op in op_strategy(),
        kind in index_kind_strategy(),
    ) {
        common::init_test_logging();
        let mut col = int_column(&values);
        let mut index = ColumnIndex::build(kind, 0, &col);

        // delete invalidates (ids shift), append routes through the index
        let gone = col.matching_rows(&Value::Int(doomed), CmpOp::Equal);
        col.delete_rows(&gone);
        index.invalidate();
        for &v in &appended {
            col.push(Value::Int(v));
            index.on_append(&col);
        }

        let probe = Value::Int(probe);
        let scan = col.matching_rows(&probe, op);
        prop_assert_eq!(index.rows_matching(&col, &probe, op), scan);
    }

    #[test]
    fn table_print_is_stable_under_indexing(
        values in prop::collection::vec(-6i64..6, 0..48),
        probe in -7i64..7,
        op in op_strategy(),
        kind in index_kind_strategy(),
    ) {
        common::init_test_logging();
        let mut table = common::fixtures::int_table("t", &values);
        let selection = Selection::Where {
            column: "v".to_string(),
            op,
            probe: Value::Int(probe),
        };

        let mut before = Vec::new();
        let n_before = table
            .print(&["v".to_string()], &selection, false, &mut before)
            .expect("scan print");

        table.generate_index(kind, "v").expect("index");
        let mut after = Vec::new();
        let n_after = table
            .print(&["v".to_string()], &selection, false, &mut after)
            .expect("indexed print");

        prop_assert_eq!(n_before, n_after);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn int_render_parse_round_trip(v in any::<i64>()) {
        let value = Value::Int(v);
        prop_assert_eq!(Value::parse(Kind::Int, &value.to_string()).unwrap(), value);
    }

    #[test]
    fn double_render_parse_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        // parse first so -0.0 lands on its canonical form
        let value = Value::parse(Kind::Double, &f.to_string()).unwrap();
        prop_assert_eq!(Value::parse(Kind::Double, &value.to_string()).unwrap(), value);
    }

    #[test]
    fn string_render_parse_round_trip(s in "[a-zA-Z0-9_]{1,12}") {
        let value = Value::Str(s);
        prop_assert_eq!(Value::parse(Kind::Str, &value.to_string()).unwrap(), value);
    }
}
