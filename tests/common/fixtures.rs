//! Canned tables for integration tests.

use sillydb::table::Table;
use sillydb::value::{Kind, Value};

/// A batch of single-value rows for a one-column table.
pub fn int_batch(values: &[i64]) -> Vec<Vec<Value>> {
    values.iter().map(|&v| vec![Value::Int(v)]).collect()
}

/// A table with a single int column `v`.
pub fn int_table(name: &str, values: &[i64]) -> Table {
    let mut table = Table::new(name);
    table.add_column("v", Kind::Int).expect("add column");
    table.insert_rows(int_batch(values));
    table
}

/// A table with columns `id` (int) and `name` (string).
pub fn people(name: &str, rows: &[(i64, &str)]) -> Table {
    let mut table = Table::new(name);
    table.add_column("id", Kind::Int).expect("add id");
    table.add_column("name", Kind::Str).expect("add name");
    let batch = rows
        .iter()
        .map(|&(id, n)| vec![Value::Int(id), Value::Str(n.to_string())])
        .collect();
    table.insert_rows(batch);
    table
}
