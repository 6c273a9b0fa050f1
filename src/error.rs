//! Error types for the storage engine and the shell.
//!
//! Every failure the dispatcher can report is a [`SillyError`] variant. The
//! variant messages are the exact strings the shell prints; the dispatcher
//! only decides the frame (`Error during <CMD>: ...` or a bare line).

use thiserror::Error;

use crate::value::Kind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SillyError>;

/// Every failure surfaced to the dispatcher.
#[derive(Debug, Error)]
pub enum SillyError {
    /// CREATE named a table that already exists.
    #[error("Cannot create already existing table {0}")]
    DuplicateTable(String),

    /// A command named a table the database does not hold.
    #[error("{0} does not name a table in the database")]
    MissingTable(String),

    /// A command named a column its table does not hold.
    #[error("{column} does not name a column in {table}")]
    MissingColumn {
        /// Table that was searched.
        table: String,
        /// Column name that was not found.
        column: String,
    },

    /// CREATE repeated a column name within one table.
    #[error("{column} already names a column in {table}")]
    DuplicateColumn {
        /// Table being created.
        table: String,
        /// The repeated name.
        column: String,
    },

    /// Columns are fixed once the first row exists.
    #[error("cannot add column {column} to {table} after rows exist")]
    ColumnAfterRows {
        /// Table that already holds rows.
        table: String,
        /// Column that was rejected.
        column: String,
    },

    /// CREATE used a type token other than `int`, `double`, `bool`, `string`.
    #[error("{0} does not name a column type")]
    UnknownType(String),

    /// A literal could not be parsed as the column's kind.
    #[error("{literal} is not a valid {kind} value")]
    ParseValue {
        /// The offending token.
        literal: String,
        /// The kind it was parsed against.
        kind: Kind,
    },

    /// JOIN columns must share a kind.
    #[error("cannot join {left} to {right}: column types differ")]
    KindMismatch {
        /// Join column of the first table.
        left: String,
        /// Join column of the second table.
        right: String,
    },

    /// Wrong keyword, count, operator, or side token in a command.
    ///
    /// Printed bare, without the `Error during` frame. The payload is the
    /// command word as the message spells it (`insert`, `print`, `DELETE`,
    /// `JOIN`, `GENERATE`).
    #[error("Invalid {0} command")]
    Malformed(&'static str),

    /// The first token of a line is not a known command.
    #[error("Error: unrecognized command")]
    UnknownCommand,

    /// Writing to the output sink failed; unrecoverable.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
