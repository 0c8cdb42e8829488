//! Merges the three seasonal destination sheets into one combined sheet with a
//! score column per season.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::io::TableStore;
use crate::merge::{KeyedMerge, RowKey, fill_if_blank};
use crate::model::{Cell, ConsolidatedRecord, Row, Season, sort_by_name};
use crate::seasonal::column;

/// Outcome of rebuilding the combined sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedReport {
    pub destination: String,
    /// Data rows read per season, in [`Season::ALL`] order.
    pub rows_read: [usize; 3],
    pub rows_written: usize,
    /// Non-fatal problems, one per missing seasonal sheet.
    pub warnings: Vec<String>,
}

impl fmt::Display for CombinedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        write!(
            f,
            "Combined: wrote {} rows to '{}' (read",
            self.rows_written, self.destination
        )?;
        for (index, season) in Season::ALL.iter().enumerate() {
            let separator = if index == 0 { "" } else { "," };
            write!(f, "{separator} {season} {}", self.rows_read[season.index()])?;
        }
        f.write_str(")")
    }
}

/// Header of the combined sheet.
pub fn combined_header() -> Vec<String> {
    ["First Name", "Last Name", "Student ID", "Subject", "Grade"]
        .iter()
        .map(|label| label.to_string())
        .chain(Season::ALL.iter().map(|season| format!("{season} Score")))
        .collect()
}

/// Rebuilds the combined sheet from whichever seasonal sheets exist.
///
/// Missing seasonal sheets only produce a warning; the combined sheet is
/// always rewritten, with just its header when no season contributed rows.
#[instrument(level = "info", skip_all, fields(destination = %config.combined))]
pub fn rebuild_combined<S: TableStore + ?Sized>(
    store: &mut S,
    config: &Config,
) -> Result<CombinedReport> {
    let mut warnings = Vec::new();
    let mut rows_read = [0; 3];
    let mut merge = KeyedMerge::new();

    for season in Season::ALL {
        let sheet = &config.season(season).destination;
        let Some(rows) = store.read_table(sheet)? else {
            warn!(%season, %sheet, "seasonal sheet missing; skipping");
            warnings.push(format!("{season} sheet '{sheet}' not found; skipped"));
            continue;
        };
        let data = rows.get(1..).unwrap_or_default();
        rows_read[season.index()] = data.len();
        merge_season(&mut merge, season, data);
        debug!(%season, rows = data.len(), records = merge.len(), "merged season");
    }

    let records = sort_by_name(merge.into_values());

    let rows_written = records.len();
    let body: Vec<Row> = records
        .into_iter()
        .map(ConsolidatedRecord::into_row)
        .collect();
    store.write_table(&config.combined, &combined_header(), body)?;
    info!(rows = rows_written, "combined sheet rebuilt");

    Ok(CombinedReport {
        destination: config.combined.clone(),
        rows_read,
        rows_written,
        warnings,
    })
}

/// Folds one season's destination rows into the running merge.
pub fn merge_season(merge: &mut KeyedMerge<ConsolidatedRecord>, season: Season, rows: &[Row]) {
    for row in rows {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        let identifier = cell(column::IDENTIFIER);
        let last_name = cell(column::LAST_NAME);
        let first_name = cell(column::FIRST_NAME);
        if identifier.is_blank() && last_name.is_blank() && first_name.is_blank() {
            continue;
        }
        let subject = cell(column::SUBJECT);

        let key = RowKey::new(&identifier, &subject);
        let record = merge.get_or_insert_with(key, || ConsolidatedRecord::new(identifier, subject));
        record.scores[season.index()] = cell(column::SCORE);
        fill_if_blank(&mut record.last_name, &last_name);
        fill_if_blank(&mut record.first_name, &first_name);
        fill_if_blank(&mut record.grade, &cell(column::GRADE));
    }
}
