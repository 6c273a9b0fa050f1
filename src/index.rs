//! Secondary indexes: value → ascending row-id buckets.
//!
//! Two variants share one surface. The hash variant answers equality from
//! an unordered map and falls back to scanning the owner column for range
//! operators; the ordered variant additionally answers strictly-greater
//! from a range walk. Strictly-less scans the column in both variants: the
//! lower region of the ordered map would have to be walked bucket by bucket
//! anyway, which is no cheaper than the scan.
//!
//! Deletion renumbers row ids, so the owning table invalidates the index
//! instead of patching it; the next operation that consults the map
//! rebuilds it first. Paths that never consult the map neither rebuild nor
//! clear the flag.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use tracing::trace;

use crate::column::Column;
use crate::value::{CmpOp, Value};

/// Which index structure a GENERATE request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    /// Unordered map; equality only.
    Hash,
    /// Ordered map; equality and strictly-greater.
    Bst,
}

impl IndexKind {
    /// Parse the variant token of a GENERATE command.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "hash" => Some(Self::Hash),
            "bst" => Some(Self::Bst),
            _ => None,
        }
    }

    /// The token this variant spells in the command language.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Bst => "bst",
        }
    }
}

/// A table's at-most-one secondary index, bound to one column by position.
///
/// The back-reference to the owner column is positional; the table passes
/// the column in on every call, so ownership flows one way.
#[derive(Debug)]
pub struct ColumnIndex {
    column: usize,
    map: IndexMap,
    stale: bool,
}

#[derive(Debug)]
enum IndexMap {
    Hash(HashMap<Value, Vec<usize>>),
    Ordered(BTreeMap<Value, Vec<usize>>),
}

impl ColumnIndex {
    /// Build a fresh index of the requested variant over a column.
    #[must_use]
    pub fn build(kind: IndexKind, column_pos: usize, column: &Column) -> Self {
        let map = match kind {
            IndexKind::Hash => IndexMap::Hash(HashMap::with_capacity(column.len())),
            IndexKind::Bst => IndexMap::Ordered(BTreeMap::new()),
        };
        let mut index = Self {
            column: column_pos,
            map,
            stale: false,
        };
        index.rebuild(column);
        index
    }

    /// Position of the owner column in its table.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// The variant this index was built as.
    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        match self.map {
            IndexMap::Hash(_) => IndexKind::Hash,
            IndexMap::Ordered(_) => IndexKind::Bst,
        }
    }

    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Suspend the map; the next consulting call rebuilds it.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Rebuild now if stale; no-op otherwise.
    pub fn refresh(&mut self, column: &Column) {
        if self.stale {
            self.rebuild(column);
        }
    }

    /// Number of distinct keys. Consults the map, so a stale index
    /// rebuilds first.
    pub fn distinct(&mut self, column: &Column) -> usize {
        self.refresh(column);
        match &self.map {
            IndexMap::Hash(m) => m.len(),
            IndexMap::Ordered(m) => m.len(),
        }
    }

    /// Register the value just appended at the owner column's tail.
    ///
    /// A stale index rebuilds from the column instead, which already
    /// includes the new row.
    pub fn on_append(&mut self, column: &Column) {
        if self.stale {
            self.rebuild(column);
            return;
        }
        let row = column.len() - 1;
        let key = column.value(row);
        match &mut self.map {
            IndexMap::Hash(m) => m.entry(key).or_default().push(row),
            IndexMap::Ordered(m) => m.entry(key).or_default().push(row),
        }
    }

    /// Row ids whose column value stands in relation `op` to `probe`,
    /// ascending. Sortedness is a hard contract: the result feeds both
    /// printing and `delete_rows`.
    pub fn rows_matching(&mut self, column: &Column, probe: &Value, op: CmpOp) -> Vec<usize> {
        match op {
            CmpOp::Equal => {
                self.refresh(column);
                // buckets fill in append order, so they are already ascending
                match &self.map {
                    IndexMap::Hash(m) => m.get(probe).cloned().unwrap_or_default(),
                    IndexMap::Ordered(m) => m.get(probe).cloned().unwrap_or_default(),
                }
            }
            CmpOp::Greater => {
                if matches!(self.map, IndexMap::Hash(_)) {
                    return column.matching_rows(probe, op);
                }
                self.refresh(column);
                let IndexMap::Ordered(m) = &self.map else {
                    unreachable!("checked above");
                };
                let mut rows: Vec<usize> = m
                    .range((Bound::Excluded(probe), Bound::Unbounded))
                    .flat_map(|(_, bucket)| bucket.iter().copied())
                    .collect();
                rows.sort_unstable();
                rows
            }
            CmpOp::Less => column.matching_rows(probe, op),
        }
    }

    /// Equality bucket of a fresh index, for join probing.
    ///
    /// Callers must [`refresh`](Self::refresh) a stale index before
    /// probing it.
    #[must_use]
    pub fn bucket(&self, probe: &Value) -> Option<&[usize]> {
        debug_assert!(!self.stale, "stale index consulted");
        match &self.map {
            IndexMap::Hash(m) => m.get(probe).map(Vec::as_slice),
            IndexMap::Ordered(m) => m.get(probe).map(Vec::as_slice),
        }
    }

    fn rebuild(&mut self, column: &Column) {
        match &mut self.map {
            IndexMap::Hash(m) => {
                m.clear();
                for row in 0..column.len() {
                    m.entry(column.value(row)).or_default().push(row);
                }
            }
            IndexMap::Ordered(m) => {
                m.clear();
                for row in 0..column.len() {
                    m.entry(column.value(row)).or_default().push(row);
                }
            }
        }
        self.stale = false;
        trace!(rows = column.len(), column = column.name(), "index rebuilt");
    }
}
