use std::path::Path;

use tracing::{info, instrument};

use crate::config::Config;
use crate::consolidate::{self, CombinedReport};
use crate::error::Result;
use crate::io::WorkbookStore;
use crate::model::Season;
use crate::seasonal::{self, SeasonOutcome, SeasonReport};

/// Usage notes shown by the `guide` command.
pub const GUIDE: &str = "\
Season refresh
  Reads the season's source sheet, keeps rows whose category contains the
  filter (default MATH, any case), keeps the first row per student and
  subject, sorts by last then first name, and overwrites the season's
  destination sheet with: Student ID, Last Name, First Name, Subject, Grade,
  and the season's score column.

  refresh --season fall|winter|spring   refresh one season
  refresh-all                           refresh fall, winter, and spring

Combined table
  Reads the three destination sheets and writes one row per student and
  subject with a score column per season. Names and grade come from the first
  season that has them. Missing seasons are skipped with a warning.

  combine                               rebuild the combined sheet

Every command rewrites its output sheets from scratch. Run the season
refreshes first, then combine.

Pass --config with a JSON file to change sheet names, the filter, or the
source column layout. Fields left out keep the defaults below.";

/// Guide text followed by the default configuration as JSON, ready to copy
/// into a `--config` file.
pub fn guide() -> Result<String> {
    let defaults = serde_json::to_string_pretty(&Config::default())?;
    Ok(format!("{GUIDE}\n\n{defaults}"))
}

/// Refreshes one season of the workbook at `input` and saves it to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), %season)
)]
pub fn refresh_season(
    input: &Path,
    output: &Path,
    config: &Config,
    season: Season,
) -> Result<SeasonReport> {
    let mut store = WorkbookStore::open(input)?;
    let report = seasonal::refresh_season(&mut store, config, season)?;
    store.save(output)?;
    Ok(report)
}

/// Refreshes every season of the workbook. The workbook is saved when at
/// least one season succeeded.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn refresh_all_seasons(
    input: &Path,
    output: &Path,
    config: &Config,
) -> Result<Vec<SeasonOutcome>> {
    let mut store = WorkbookStore::open(input)?;
    let outcomes = seasonal::refresh_all_seasons(&mut store, config);
    let refreshed = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_ok())
        .count();
    if refreshed > 0 {
        store.save(output)?;
    }
    info!(refreshed, failed = outcomes.len() - refreshed, "seasons processed");
    Ok(outcomes)
}

/// Rebuilds the combined sheet of the workbook and saves it.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn rebuild_combined(input: &Path, output: &Path, config: &Config) -> Result<CombinedReport> {
    let mut store = WorkbookStore::open(input)?;
    let report = consolidate::rebuild_combined(&mut store, config)?;
    store.save(output)?;
    Ok(report)
}
