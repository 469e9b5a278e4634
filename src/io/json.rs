use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::SystemResult;
use crate::error::Result;
use crate::types::CaseTable;

/// Report summary: table size, best case and the sized system.
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub title: &'a str,
    pub cases: usize,
    #[serde(flatten)]
    pub system: &'a SystemResult,
    pub recommendation: String,
}

impl<'a> Summary<'a> {
    pub fn new(title: &'a str, table: &CaseTable, system: &'a SystemResult) -> Self {
        Self {
            title,
            cases: table.len(),
            system,
            recommendation: system.recommendation(),
        }
    }
}

/// Write the summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &Summary<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &Summary<'_>) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
