use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::io::excel_read;
use crate::io::excel_write;
use crate::io::store::{MemoryStore, TableStore};
use crate::model::Row;

/// Table store backed by an `.xlsx` workbook on disk.
///
/// The whole workbook is loaded on [`open`](Self::open); writes stay in
/// memory until [`save`](Self::save) rewrites the file.
#[derive(Debug)]
pub struct WorkbookStore {
    sheets: MemoryStore,
}

impl WorkbookStore {
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let sheets = excel_read::read_sheets(path)?;
        debug!(sheets = ?sheets.sheet_names(), "workbook loaded");
        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &MemoryStore {
        &self.sheets
    }

    /// Writes the workbook, including untouched sheets, to `path`.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        excel_write::write_sheets(path, &self.sheets)
    }
}

impl TableStore for WorkbookStore {
    fn read_table(&self, name: &str) -> Result<Option<Vec<Row>>> {
        self.sheets.read_table(name)
    }

    fn write_table(&mut self, name: &str, header: &[String], rows: Vec<Row>) -> Result<()> {
        self.sheets.write_table(name, header, rows)
    }
}
