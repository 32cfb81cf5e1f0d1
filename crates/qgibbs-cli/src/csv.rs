//! Append-only CSV log of experiment records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use qgibbs_core::ExperimentRecord;

/// Writes the header once, then one flushed row per record.
pub struct CsvLog<W: Write> {
    writer: W,
    rows: usize,
}

impl CsvLog<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header.
    pub fn create(path: &Path) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CsvLog<W> {
    /// Wrap `writer` and write the header.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", ExperimentRecord::HEADER.join(","))?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append one record. Rows are flushed immediately so an aborted sweep
    /// keeps every finished row.
    pub fn append(&mut self, record: &ExperimentRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record.fields().join(","))?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Recover the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}
