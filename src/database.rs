//! The database: a registry of named tables.

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::error::{Result, SillyError};
use crate::table::{JoinSide, Table};

/// An injective mapping from name to table.
#[derive(Debug, Default)]
pub struct Database {
    tables: HashMap<String, Table>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Register a fully-built table.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::DuplicateTable`] if the name is taken.
    pub fn create(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(SillyError::DuplicateTable(table.name().to_string()));
        }
        debug!(table = %table.name(), columns = table.column_count(), "created table");
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Erase a table, dropping its columns and index.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::MissingTable`] if the name is unknown.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(SillyError::MissingTable(name.to_string()));
        }
        debug!(table = name, "removed table");
        Ok(())
    }

    /// Look up a table.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::MissingTable`] if the name is unknown.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| SillyError::MissingTable(name.to_string()))
    }

    /// Look up a table for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`SillyError::MissingTable`] if the name is unknown.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| SillyError::MissingTable(name.to_string()))
    }

    /// Inner equi-join of two tables on `left.my_col = right.their_col`.
    ///
    /// A stale probe-side index bound to `their_col` is rebuilt in place
    /// first, so the join reuses it and the owner comes out fresh. The
    /// tables themselves are then borrowed shared, which keeps self-joins
    /// legal.
    ///
    /// # Errors
    ///
    /// Fails on unknown tables or columns, mismatched column kinds, or
    /// sink errors.
    #[allow(clippy::too_many_arguments)]
    pub fn join(
        &mut self,
        left: &str,
        right: &str,
        my_col: &str,
        their_col: &str,
        projection: &[(String, JoinSide)],
        quiet: bool,
        out: &mut impl Write,
    ) -> Result<usize> {
        self.table_mut(right)?.refresh_index(their_col)?;
        let left_table = self.table(left)?;
        let right_table = self.table(right)?;
        left_table.join(right_table, my_col, their_col, projection, quiet, out)
    }
}
