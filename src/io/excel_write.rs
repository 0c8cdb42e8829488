use std::path::Path;

use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};

use crate::error::{Result, ToolError};
use crate::io::store::MemoryStore;
use crate::model::Cell;

/// Error codes Excel accepts as literal formula constants.
const ERROR_LITERALS: [&str; 7] = [
    "#DIV/0!", "#N/A", "#NAME?", "#NULL!", "#NUM!", "#REF!", "#VALUE!",
];

/// Number formats that make serial values read back as dates and durations.
struct CellFormats {
    date: Format,
    date_time: Format,
    duration: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            date_time: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// Writes every sheet held by `store` to the given path, in store order.
pub fn write_sheets(path: &Path, store: &MemoryStore) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let formats = CellFormats::new();

    for (name, rows) in store.sheets() {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(name)?;

        for (row_idx, row) in rows.iter().enumerate() {
            let row_idx = u32::try_from(row_idx).map_err(|_| too_large(name))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_idx = u16::try_from(col_idx).map_err(|_| too_large(name))?;
                write_cell(worksheet, &formats, row_idx, col_idx, cell)?;
            }
        }

        worksheet.autofit();
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    formats: &CellFormats,
    row: u32,
    col: u16,
    cell: &Cell,
) -> Result<()> {
    match cell {
        Cell::Blank => {}
        Cell::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        Cell::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        Cell::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        Cell::DateTime(value) => {
            let format = if value.fract() == 0.0 {
                &formats.date
            } else {
                &formats.date_time
            };
            worksheet.write_number_with_format(row, col, *value, format)?;
        }
        Cell::Duration(value) => {
            worksheet.write_number_with_format(row, col, *value, &formats.duration)?;
        }
        Cell::Error(code) if ERROR_LITERALS.contains(&code.as_str()) => {
            let formula = Formula::new(format!("={code}")).set_result(code.as_str());
            worksheet.write_formula(row, col, formula)?;
        }
        Cell::Error(code) => {
            worksheet.write_string(row, col, code)?;
        }
    }
    Ok(())
}

fn too_large(sheet: &str) -> ToolError {
    ToolError::InvalidWorkbook(format!("sheet '{sheet}' exceeds the worksheet size limits"))
}
