//! Tables: typed columns sharing a row count, plus at most one index.
//!
//! A table owns its columns and its active index outright. Predicate
//! evaluation picks between the index and a full scan transparently; both
//! paths must produce the same ascending row-id list. Printing goes through
//! an `io::Write` sink so callers (and tests) choose where rows land.

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::column::Column;
use crate::error::{Result, SillyError};
use crate::index::{ColumnIndex, IndexKind};
use crate::value::{CmpOp, Kind, Value};

/// Row selection for a print: every row, or rows satisfying one predicate.
#[derive(Debug)]
pub enum Selection {
    All,
    Where {
        column: String,
        op: CmpOp,
        probe: Value,
    },
}

/// Which side of a join a projected column comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

/// A named collection of equal-length columns with at most one index.
#[derive(Debug)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    by_name: HashMap<String, usize>,
    index: Option<ColumnIndex>,
}

impl Table {
    /// Create an empty table with no columns.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            by_name: HashMap::new(),
            index: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All columns share this length.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Column kinds in canonical order, for typing an INSERT batch.
    pub fn column_kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.columns.iter().map(Column::kind)
    }

    /// Look up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::MissingColumn`] if the name is unknown.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_pos(name).map(|pos| &self.columns[pos])
    }

    /// The active index, if any: owner column name, variant, staleness.
    #[must_use]
    pub fn active_index(&self) -> Option<(&str, IndexKind, bool)> {
        self.index
            .as_ref()
            .map(|idx| (self.columns[idx.column()].name(), idx.kind(), idx.is_stale()))
    }

    /// Append a column. Only legal before the first row exists.
    ///
    /// # Errors
    ///
    /// Rejects duplicate names and tables that already hold rows.
    pub fn add_column(&mut self, name: &str, kind: Kind) -> Result<()> {
        if self.row_count() > 0 {
            return Err(SillyError::ColumnAfterRows {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(SillyError::DuplicateColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        self.by_name.insert(name.to_string(), self.columns.len());
        self.columns.push(Column::new(name, kind));
        Ok(())
    }

    /// Append a batch of fully-typed rows.
    ///
    /// Each row's arity and kinds must match the columns in order; the
    /// dispatcher types the whole batch before calling, so a failed parse
    /// appends nothing. The owner column of an active index is routed
    /// through the index so it stays fresh. Returns the first new row id
    /// and the number of rows appended; the new range is contiguous.
    pub fn insert_rows(&mut self, batch: Vec<Vec<Value>>) -> (usize, usize) {
        let first = self.row_count();
        let count = batch.len();
        let indexed = self.index.as_ref().map(ColumnIndex::column);
        for row in batch {
            debug_assert_eq!(row.len(), self.columns.len());
            for (pos, value) in row.into_iter().enumerate() {
                self.columns[pos].push(value);
                if indexed == Some(pos) {
                    if let Some(index) = self.index.as_mut() {
                        index.on_append(&self.columns[pos]);
                    }
                }
            }
        }
        debug!(table = %self.name, rows = count, first, "inserted rows");
        (first, count)
    }

    /// Print a projection of the selected rows and return the match count.
    ///
    /// Header and rows go to `out` in ascending row-id order, each field
    /// followed by a single space, each line newline-terminated. Quiet mode
    /// emits nothing but still counts. The active index is used exactly
    /// when the selection filters on its owner column.
    ///
    /// # Errors
    ///
    /// Fails on unknown projection or filter columns, or on sink errors.
    pub fn print(
        &mut self,
        projection: &[String],
        selection: &Selection,
        quiet: bool,
        out: &mut impl Write,
    ) -> Result<usize> {
        let fields: Vec<usize> = projection
            .iter()
            .map(|name| self.column_pos(name))
            .collect::<Result<_>>()?;

        let rows: Vec<usize> = match selection {
            Selection::All => (0..self.row_count()).collect(),
            Selection::Where { column, op, probe } => self.matching_rows(column, *op, probe)?,
        };

        if !quiet {
            for name in projection {
                write!(out, "{name} ")?;
            }
            writeln!(out)?;
            for &row in &rows {
                for &pos in &fields {
                    self.columns[pos].write_value(row, out)?;
                    write!(out, " ")?;
                }
                writeln!(out)?;
            }
        }
        Ok(rows.len())
    }

    /// Delete every row satisfying the predicate; returns the count.
    ///
    /// The id list comes from the same selection rule as print. Row ids
    /// shift, so any active index is invalidated — once per call, even
    /// when nothing matched.
    ///
    /// # Errors
    ///
    /// Fails on an unknown filter column.
    pub fn delete_where(&mut self, column: &str, op: CmpOp, probe: &Value) -> Result<usize> {
        let rows = self.matching_rows(column, op, probe)?;
        for col in &mut self.columns {
            col.delete_rows(&rows);
        }
        if let Some(index) = self.index.as_mut() {
            index.invalidate();
        }
        debug!(table = %self.name, deleted = rows.len(), "deleted rows");
        Ok(rows.len())
    }

    /// Build (or keep) the table's index and return its distinct-key count.
    ///
    /// An index already bound to the requested column is kept as-is,
    /// whatever variant was asked for. Otherwise any existing index is
    /// discarded and a fresh one of the requested variant is built.
    ///
    /// # Errors
    ///
    /// Fails on an unknown column.
    pub fn generate_index(&mut self, kind: IndexKind, column: &str) -> Result<usize> {
        let pos = self.column_pos(column)?;
        if let Some(index) = self.index.as_mut() {
            if index.column() == pos {
                return Ok(index.distinct(&self.columns[pos]));
            }
        }
        let mut index = ColumnIndex::build(kind, pos, &self.columns[pos]);
        let distinct = index.distinct(&self.columns[pos]);
        debug!(table = %self.name, column, kind = kind.name(), distinct, "built index");
        self.index = Some(index);
        Ok(distinct)
    }

    /// Rebuild the active index in place if it is stale and bound to
    /// `column`. Used before a join so the probe side comes out fresh.
    ///
    /// # Errors
    ///
    /// Fails on an unknown column.
    pub fn refresh_index(&mut self, column: &str) -> Result<()> {
        let pos = self.column_pos(column)?;
        if let Some(index) = self.index.as_mut() {
            if index.column() == pos {
                index.refresh(&self.columns[pos]);
            }
        }
        Ok(())
    }

    /// Inner equi-join on `self.my_col = other.their_col`.
    ///
    /// Iterates this table's rows ascending and probes the other side
    /// through its active index when that index is bound to `their_col`
    /// and fresh — [`crate::database::Database::join`] freshens it
    /// beforehand — otherwise through a transient hash index that is
    /// dropped on return. Matches within a bucket emit ascending. Quiet
    /// mode suppresses header and rows but still counts. Self-joins are
    /// legal.
    ///
    /// # Errors
    ///
    /// Fails on unknown columns, mismatched column kinds, or sink errors.
    pub fn join(
        &self,
        other: &Self,
        my_col: &str,
        their_col: &str,
        projection: &[(String, JoinSide)],
        quiet: bool,
        out: &mut impl Write,
    ) -> Result<usize> {
        let my_pos = self.column_pos(my_col)?;
        let their_pos = other.column_pos(their_col)?;
        let left = &self.columns[my_pos];
        let right = &other.columns[their_pos];
        if left.kind() != right.kind() {
            return Err(SillyError::KindMismatch {
                left: my_col.to_string(),
                right: their_col.to_string(),
            });
        }

        let fields: Vec<(JoinSide, usize)> = projection
            .iter()
            .map(|(name, side)| {
                let pos = match side {
                    JoinSide::Left => self.column_pos(name)?,
                    JoinSide::Right => other.column_pos(name)?,
                };
                Ok((*side, pos))
            })
            .collect::<Result<_>>()?;

        if !quiet {
            for (name, _) in projection {
                write!(out, "{name} ")?;
            }
            writeln!(out)?;
        }

        let reused = match &other.index {
            Some(idx) if idx.column() == their_pos && !idx.is_stale() => Some(idx),
            _ => None,
        };
        let transient;
        let probe = match reused {
            Some(idx) => idx,
            None => {
                transient = ColumnIndex::build(IndexKind::Hash, their_pos, right);
                &transient
            }
        };

        let mut emitted = 0;
        for i in 0..left.len() {
            let Some(bucket) = probe.bucket(&left.value(i)) else {
                continue;
            };
            for &j in bucket {
                emitted += 1;
                if quiet {
                    continue;
                }
                for &(side, pos) in &fields {
                    match side {
                        JoinSide::Left => self.columns[pos].write_value(i, out)?,
                        JoinSide::Right => other.columns[pos].write_value(j, out)?,
                    }
                    write!(out, " ")?;
                }
                writeln!(out)?;
            }
        }
        debug!(
            left = %self.name,
            right = %other.name,
            emitted,
            reused_index = reused.is_some(),
            "joined tables"
        );
        Ok(emitted)
    }

    /// Ascending row ids satisfying `column op probe`, via the index when
    /// it covers the filter column and via a full scan otherwise. Both
    /// paths return the same list.
    fn matching_rows(&mut self, column: &str, op: CmpOp, probe: &Value) -> Result<Vec<usize>> {
        let pos = self.column_pos(column)?;
        if let Some(index) = self.index.as_mut() {
            if index.column() == pos {
                return Ok(index.rows_matching(&self.columns[pos], probe, op));
            }
        }
        Ok(self.columns[pos].matching_rows(probe, op))
    }

    fn column_pos(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SillyError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }
}
