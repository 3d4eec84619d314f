use anyhow::{Context, Result};
use std::io::Write;

use crate::table::Table;

/// Writes a table as JSON Lines, one row object per line.
///
/// Presentation only — the [`Table`](crate::Table) itself stays the primary
/// API surface; this is how the CLI hands results to the analyst.
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter { writer }
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        for row in table.rows() {
            let json = serde_json::to_string(row).context("Failed to serialize row")?;
            writeln!(self.writer, "{}", json).context("Failed to write row")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}
