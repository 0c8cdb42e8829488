//! Builds a season's destination sheet from its raw source export.
//!
//! Rows whose category contains the configured filter are projected to six
//! columns, reduced to the first row per student and subject, ordered by name,
//! and written over the destination sheet.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use crate::config::{Config, SeasonSheets, SourceLayout};
use crate::error::{Result, ToolError};
use crate::io::TableStore;
use crate::merge::{KeyedMerge, RowKey};
use crate::model::{Cell, FilteredRow, Row, Season, sort_by_name};

/// Leading labels of a destination sheet; the season's score header follows.
pub const DESTINATION_COLUMNS: [&str; 5] =
    ["Student ID", "Last Name", "First Name", "Subject", "Grade"];

/// Column positions inside a destination sheet.
pub(crate) mod column {
    pub const IDENTIFIER: usize = 0;
    pub const LAST_NAME: usize = 1;
    pub const FIRST_NAME: usize = 2;
    pub const SUBJECT: usize = 3;
    pub const GRADE: usize = 4;
    pub const SCORE: usize = 5;
}

/// Outcome of a successful season refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonReport {
    pub season: Season,
    pub source: String,
    pub destination: String,
    pub filter: String,
    /// Data rows read from the source, header excluded.
    pub source_rows: usize,
    /// Rows whose category matched the filter.
    pub matched: usize,
    pub rows_written: usize,
}

impl SeasonReport {
    pub fn duplicates_dropped(&self) -> usize {
        self.matched - self.rows_written
    }

    /// True when the filter matched nothing and only the header was written.
    pub fn is_empty(&self) -> bool {
        self.rows_written == 0
    }
}

impl fmt::Display for SeasonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(
                f,
                "warning: {}: no rows in '{}' matched '{}'; wrote header only to '{}'",
                self.season, self.source, self.filter, self.destination
            );
        }
        write!(
            f,
            "{}: wrote {} rows to '{}' from {} rows in '{}'",
            self.season, self.rows_written, self.destination, self.source_rows, self.source
        )?;
        if self.duplicates_dropped() > 0 {
            write!(f, " ({} duplicates dropped)", self.duplicates_dropped())?;
        }
        Ok(())
    }
}

/// Header written to a season's destination sheet.
pub fn destination_header(sheets: &SeasonSheets) -> Vec<String> {
    DESTINATION_COLUMNS
        .iter()
        .map(|label| label.to_string())
        .chain(std::iter::once(sheets.score_header.clone()))
        .collect()
}

/// Rebuilds the destination sheet of `season` from its source sheet.
///
/// Fails without writing when the source sheet is missing or holds no data
/// rows. A filter that matches nothing still rewrites the destination with
/// its header.
#[instrument(level = "info", skip_all, fields(%season))]
pub fn refresh_season<S: TableStore + ?Sized>(
    store: &mut S,
    config: &Config,
    season: Season,
) -> Result<SeasonReport> {
    let sheets = config.season(season);
    let rows = store
        .read_table(&sheets.source)?
        .ok_or_else(|| ToolError::MissingSource {
            season,
            sheet: sheets.source.clone(),
        })?;
    if rows.len() < 2 {
        return Err(ToolError::EmptySource {
            season,
            sheet: sheets.source.clone(),
        });
    }
    let data = &rows[1..];

    let matched = select_rows(data, &config.layout, &config.filter);
    let matched_count = matched.len();
    let unique = sort_by_name(dedupe(matched));
    debug!(
        source_rows = data.len(),
        matched = matched_count,
        unique = unique.len(),
        "filtered source rows"
    );

    let rows_written = unique.len();
    let body: Vec<Row> = unique.into_iter().map(FilteredRow::into_row).collect();
    store.write_table(&sheets.destination, &destination_header(sheets), body)?;

    let report = SeasonReport {
        season,
        source: sheets.source.clone(),
        destination: sheets.destination.clone(),
        filter: config.filter.clone(),
        source_rows: data.len(),
        matched: matched_count,
        rows_written,
    };
    if report.is_empty() {
        warn!(filter = %config.filter, source = %sheets.source, "no rows matched filter");
    } else {
        info!(rows = rows_written, destination = %sheets.destination, "season refreshed");
    }
    Ok(report)
}

/// Result of one season within [`refresh_all_seasons`].
#[derive(Debug)]
pub struct SeasonOutcome {
    pub season: Season,
    pub result: Result<SeasonReport>,
}

/// Refreshes every season in order. A failing season does not stop the
/// remaining ones.
#[instrument(level = "info", skip_all)]
pub fn refresh_all_seasons<S: TableStore + ?Sized>(
    store: &mut S,
    config: &Config,
) -> Vec<SeasonOutcome> {
    Season::ALL
        .into_iter()
        .map(|season| {
            let result = refresh_season(&mut *store, config, season);
            if let Err(error) = &result {
                warn!(%season, %error, "season refresh failed");
            }
            SeasonOutcome { season, result }
        })
        .collect()
}

/// Keeps rows whose category contains `filter`, ignoring case, and projects
/// them to destination columns. Input order is preserved.
pub fn select_rows(rows: &[Row], layout: &SourceLayout, filter: &str) -> Vec<FilteredRow> {
    let needle = filter.to_uppercase();
    rows.iter()
        .filter(|row| {
            field(row, layout, layout.category)
                .to_text()
                .to_uppercase()
                .contains(&needle)
        })
        .map(|row| FilteredRow {
            identifier: field(row, layout, layout.identifier),
            last_name: field(row, layout, layout.last_name),
            first_name: field(row, layout, layout.first_name),
            subject: field(row, layout, layout.subject),
            grade: field(row, layout, layout.grade),
            score: field(row, layout, layout.score),
        })
        .collect()
}

/// Keeps the first row for each student and subject.
pub fn dedupe(rows: Vec<FilteredRow>) -> Vec<FilteredRow> {
    let mut merge = KeyedMerge::new();
    for row in rows {
        let key = RowKey::new(&row.identifier, &row.subject);
        merge.insert_if_absent(key, row);
    }
    merge.into_values()
}

fn field(row: &Row, layout: &SourceLayout, offset: usize) -> Cell {
    row.get(layout.start_column + offset)
        .cloned()
        .unwrap_or_default()
}
