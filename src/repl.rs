//! The interactive shell: tokenizer, command dispatcher, output templates.
//!
//! Commands are whitespace-separated token streams that may cross line
//! boundaries (an INSERT's values often do). On any failure the dispatcher
//! prints one message, discards the rest of the offending input line, and
//! resumes at the next command.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::database::Database;
use crate::error::{Result, SillyError};
use crate::index::IndexKind;
use crate::table::{JoinSide, Selection, Table};
use crate::value::{CmpOp, Kind, Value};

/// Whitespace tokenizer over a buffered reader.
///
/// Tokens are maximal runs of non-whitespace bytes; reads pull new lines on
/// demand, so a token request can cross any number of line breaks.
struct Tokenizer<R> {
    input: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> Tokenizer<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            pos: 0,
        }
    }

    /// Next token, or `None` at end of input.
    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            let bytes = self.line.as_bytes();
            let mut pos = self.pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < bytes.len() {
                let start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                self.pos = pos;
                return Ok(Some(self.line[start..pos].to_string()));
            }
            self.line.clear();
            self.pos = 0;
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
    }

    /// Discard the rest of the current line (error recovery).
    fn skip_line(&mut self) {
        self.pos = self.line.len();
    }
}

/// The shell: reads commands, drives the database, prints templates.
pub struct Repl<R, W> {
    tokens: Tokenizer<R>,
    out: W,
    db: Database,
    quiet: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    #[must_use]
    pub fn new(input: R, out: W, quiet: bool) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            out,
            db: Database::new(),
            quiet,
        }
    }

    /// Run commands until QUIT or end of input. Exit is clean either way.
    ///
    /// # Errors
    ///
    /// Only I/O failures on the output sink escape; command failures are
    /// reported inline and recovered from.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "% ")?;
            self.out.flush()?;
            let Some(cmd) = self.tokens.next_token()? else {
                break;
            };
            if cmd.starts_with('#') {
                self.tokens.skip_line();
                continue;
            }
            let outcome = match cmd.as_str() {
                "CREATE" => self.cmd_create(),
                "REMOVE" => self.cmd_remove(),
                "INSERT" => self.cmd_insert(),
                "PRINT" => self.cmd_print(),
                "DELETE" => self.cmd_delete(),
                "GENERATE" => self.cmd_generate(),
                "JOIN" => self.cmd_join(),
                "QUIT" => {
                    writeln!(self.out, "Thanks for being silly!")?;
                    self.out.flush()?;
                    return Ok(());
                }
                _ => Err(SillyError::UnknownCommand),
            };
            match outcome {
                Ok(()) => {}
                Err(SillyError::Io(err)) => return Err(SillyError::Io(err)),
                Err(err) => {
                    self.report(&cmd, &err)?;
                    self.tokens.skip_line();
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// One line per failure; grammar slips print bare, the rest get the
    /// `Error during <CMD>` frame.
    fn report(&mut self, cmd: &str, err: &SillyError) -> Result<()> {
        debug!(command = cmd, error = %err, "command failed");
        match err {
            SillyError::Malformed(_) | SillyError::UnknownCommand => {
                writeln!(self.out, "{err}")?;
            }
            _ => writeln!(self.out, "Error during {cmd}: {err}")?,
        }
        Ok(())
    }

    fn cmd_create(&mut self) -> Result<()> {
        let name = self.token("CREATE")?;
        let count = self.number("CREATE")?;
        if self.db.contains(&name) {
            return Err(SillyError::DuplicateTable(name));
        }
        let mut kinds = Vec::with_capacity(count);
        for _ in 0..count {
            kinds.push(Kind::from_token(&self.token("CREATE")?)?);
        }
        // the table registers only after every type and name has parsed
        let mut table = Table::new(&name);
        let mut columns = Vec::with_capacity(count);
        for kind in kinds {
            let col = self.token("CREATE")?;
            table.add_column(&col, kind)?;
            columns.push(col);
        }
        write!(self.out, "New table {name} with column(s)")?;
        for col in &columns {
            write!(self.out, " {col}")?;
        }
        writeln!(self.out, " created")?;
        self.db.create(table)?;
        Ok(())
    }

    fn cmd_remove(&mut self) -> Result<()> {
        let name = self.token("REMOVE")?;
        self.db.remove(&name)?;
        writeln!(self.out, "Table {name} removed")?;
        Ok(())
    }

    fn cmd_insert(&mut self) -> Result<()> {
        self.keyword("insert", "INTO")?;
        let name = self.token("insert")?;
        let kinds: Vec<Kind> = self.db.table(&name)?.column_kinds().collect();
        let rows = self.number("insert")?;
        self.keyword("insert", "ROWS")?;

        // type the whole batch before touching the table, so a bad literal
        // appends nothing
        let mut batch = Vec::with_capacity(rows);
        for _ in 0..rows {
            let mut row = Vec::with_capacity(kinds.len());
            for &kind in &kinds {
                row.push(Value::parse(kind, &self.token("insert")?)?);
            }
            batch.push(row);
        }

        let (first, count) = self.db.table_mut(&name)?.insert_rows(batch);
        let last = i64::try_from(first + count).unwrap_or(i64::MAX) - 1;
        writeln!(
            self.out,
            "Added {count} rows to {name} from position {first} to {last}"
        )?;
        Ok(())
    }

    fn cmd_print(&mut self) -> Result<()> {
        self.keyword("print", "FROM")?;
        let name = self.token("print")?;
        self.db.table(&name)?;
        let count = self.number("print")?;

        let mut projection = Vec::with_capacity(count);
        for _ in 0..count {
            let col = self.token("print")?;
            // validated in reading order, before the selection clause
            self.db.table(&name)?.column(&col)?;
            projection.push(col);
        }

        let clause = self.token("print")?;
        let selection = match clause.as_str() {
            "ALL" => Selection::All,
            "WHERE" => {
                let column = self.token("print")?;
                let kind = self.db.table(&name)?.column(&column)?.kind();
                let op = CmpOp::from_token(&self.token("print")?)
                    .ok_or(SillyError::Malformed("print"))?;
                let probe = Value::parse(kind, &self.token("print")?)?;
                Selection::Where { column, op, probe }
            }
            _ => return Err(SillyError::Malformed("print")),
        };

        let quiet = self.quiet;
        let matched = self
            .db
            .table_mut(&name)?
            .print(&projection, &selection, quiet, &mut self.out)?;
        writeln!(self.out, "Printed {matched} matching rows from {name}")?;
        Ok(())
    }

    fn cmd_delete(&mut self) -> Result<()> {
        self.keyword("DELETE", "FROM")?;
        let name = self.token("DELETE")?;
        self.db.table(&name)?;
        self.keyword("DELETE", "WHERE")?;
        let column = self.token("DELETE")?;
        let kind = self.db.table(&name)?.column(&column)?.kind();
        let op =
            CmpOp::from_token(&self.token("DELETE")?).ok_or(SillyError::Malformed("print"))?;
        let probe = Value::parse(kind, &self.token("DELETE")?)?;

        let deleted = self.db.table_mut(&name)?.delete_where(&column, op, &probe)?;
        writeln!(self.out, "Deleted {deleted} rows from {name}")?;
        Ok(())
    }

    fn cmd_generate(&mut self) -> Result<()> {
        self.keyword("GENERATE", "FOR")?;
        let name = self.token("GENERATE")?;
        self.db.table(&name)?;
        let variant = self.token("GENERATE")?;
        let kind = IndexKind::from_token(&variant).ok_or(SillyError::Malformed("GENERATE"))?;
        self.keyword("GENERATE", "INDEX")?;
        self.keyword("GENERATE", "ON")?;
        let column = self.token("GENERATE")?;

        let distinct = self.db.table_mut(&name)?.generate_index(kind, &column)?;
        writeln!(
            self.out,
            "Created {variant} index for table {name} on column {column}, with {distinct} distinct keys"
        )?;
        Ok(())
    }

    fn cmd_join(&mut self) -> Result<()> {
        let name1 = self.token("JOIN")?;
        self.db.table(&name1)?;
        self.keyword("JOIN", "AND")?;
        let name2 = self.token("JOIN")?;
        self.db.table(&name2)?;
        self.keyword("JOIN", "WHERE")?;
        let col1 = self.token("JOIN")?;
        self.db.table(&name1)?.column(&col1)?;
        self.keyword("JOIN", "=")?;
        let col2 = self.token("JOIN")?;
        self.db.table(&name2)?.column(&col2)?;
        self.keyword("JOIN", "AND")?;
        self.keyword("JOIN", "PRINT")?;
        let count = self.number("JOIN")?;

        let mut projection = Vec::with_capacity(count);
        for _ in 0..count {
            let col = self.token("JOIN")?;
            let side = match self.token("JOIN")?.as_str() {
                "1" => JoinSide::Left,
                "2" => JoinSide::Right,
                _ => return Err(SillyError::Malformed("print")),
            };
            let table = match side {
                JoinSide::Left => &name1,
                JoinSide::Right => &name2,
            };
            self.db.table(table)?.column(&col)?;
            projection.push((col, side));
        }

        let quiet = self.quiet;
        let emitted = self.db.join(
            &name1,
            &name2,
            &col1,
            &col2,
            &projection,
            quiet,
            &mut self.out,
        )?;
        writeln!(
            self.out,
            "Printed {emitted} rows from joining {name1} to {name2}"
        )?;
        Ok(())
    }

    fn token(&mut self, cmd: &'static str) -> Result<String> {
        self.tokens
            .next_token()?
            .ok_or(SillyError::Malformed(cmd))
    }

    fn keyword(&mut self, cmd: &'static str, expected: &str) -> Result<()> {
        if self.token(cmd)? == expected {
            Ok(())
        } else {
            Err(SillyError::Malformed(cmd))
        }
    }

    fn number(&mut self, cmd: &'static str) -> Result<usize> {
        self.token(cmd)?
            .parse()
            .map_err(|_| SillyError::Malformed(cmd))
    }
}
