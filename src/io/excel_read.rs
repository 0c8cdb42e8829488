use std::path::Path;

use calamine::{CellErrorType, DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::io::store::MemoryStore;
use crate::model::{Cell, Row};

/// Reads every sheet of an Excel workbook into memory, keeping sheet order.
///
/// Each sheet becomes a dense grid anchored at cell A1, so column offsets in
/// the configuration are absolute regardless of where the used range starts.
pub fn read_sheets(path: &Path) -> Result<MemoryStore> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut store = MemoryStore::new();

    for name in workbook.sheet_names().to_vec() {
        let range = read_required_sheet(&mut workbook, &name)?;
        store.insert_sheet(name, range_to_rows(&range));
    }

    Ok(store)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn range_to_rows(range: &Range<DataType>) -> Vec<Row> {
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let height = end_row as usize + 1;
    let width = end_col as usize + 1;

    let mut rows = vec![vec![Cell::Blank; width]; height];
    for (row, col, value) in range.used_cells() {
        rows[start_row + row][start_col + col] = cell_from(value);
    }

    while rows
        .last()
        .is_some_and(|row| row.iter().all(Cell::is_blank))
    {
        rows.pop();
    }
    rows
}

fn cell_from(value: &DataType) -> Cell {
    match value {
        DataType::String(value) => Cell::text(value.as_str()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::DateTime(*value),
        DataType::Duration(value) => Cell::Duration(*value),
        DataType::Error(error) => Cell::Error(error.to_string()),
        DataType::Empty => Cell::Blank,
        other => Cell::text(other.to_string()),
    }
}
