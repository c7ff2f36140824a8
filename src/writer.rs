//! Output CSV writer.
//!
//! Rows are appended as they are produced; the file carries the frozen
//! [`OUTPUT_HEADER`] even when no case survives extraction.

use std::fs::File;
use std::path::Path;

use crate::error::PipelineResult;
use crate::models::{OutputRow, OUTPUT_HEADER};

/// Writer for one denormalized output file: `;`-delimited, every cell
/// quoted.
pub struct RowWriter {
    inner: csv::Writer<File>,
}

impl RowWriter {
    /// Create (or overwrite) the output file and write the header row.
    pub fn create(path: &Path) -> PipelineResult<Self> {
        let mut inner = csv::WriterBuilder::new()
            .delimiter(b';')
            .quote_style(csv::QuoteStyle::Always)
            .has_headers(false)
            .from_path(path)?;
        inner.write_record(OUTPUT_HEADER)?;
        Ok(Self { inner })
    }

    pub fn write(&mut self, row: &OutputRow) -> PipelineResult<()> {
        self.inner.serialize(row)?;
        Ok(())
    }

    pub fn finish(mut self) -> PipelineResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}
