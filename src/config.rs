//! Static configuration for the transforms.
//!
//! A [`Config`] is built once per invocation, either from [`Config::default`]
//! or from a JSON file whose fields override the defaults, and is then passed
//! by reference into every transform.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::model::Season;

/// Sheet names and header label for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSheets {
    /// Sheet holding the raw export for the season.
    pub source: String,
    /// Sheet the filtered rows are written to.
    pub destination: String,
    /// Label of the score column in the destination sheet.
    pub score_header: String,
}

impl SeasonSheets {
    fn defaults_for(season: Season) -> Self {
        let label = season.label();
        Self {
            source: format!("{label} Data"),
            destination: format!("{label} Math"),
            score_header: format!("{label} Percentile"),
        }
    }
}

/// Season entry of a configuration file; unnamed fields keep the season's
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeasonOverrides {
    source: Option<String>,
    destination: Option<String>,
    score_header: Option<String>,
}

impl SeasonOverrides {
    fn resolve(self, season: Season) -> SeasonSheets {
        let defaults = SeasonSheets::defaults_for(season);
        SeasonSheets {
            source: self.source.unwrap_or(defaults.source),
            destination: self.destination.unwrap_or(defaults.destination),
            score_header: self.score_header.unwrap_or(defaults.score_header),
        }
    }
}

/// Column positions inside a source sheet.
///
/// Field offsets are relative to `start_column` and must fall inside `span`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    /// Zero-based column of the category field.
    pub start_column: usize,
    pub span: usize,
    pub category: usize,
    pub subject: usize,
    pub identifier: usize,
    pub last_name: usize,
    pub first_name: usize,
    pub grade: usize,
    pub score: usize,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            start_column: 0,
            span: 19,
            category: 0,
            subject: 1,
            identifier: 10,
            last_name: 11,
            first_name: 12,
            grade: 14,
            score: 18,
        }
    }
}

impl SourceLayout {
    fn offsets(&self) -> [(&'static str, usize); 7] {
        [
            ("category", self.category),
            ("subject", self.subject),
            ("identifier", self.identifier),
            ("last_name", self.last_name),
            ("first_name", self.first_name),
            ("grade", self.grade),
            ("score", self.score),
        ]
    }
}

/// Complete configuration of a run.
///
/// Serialises to the same JSON shape [`Config::load`] reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct Config {
    /// Case-insensitive substring a row's category must contain.
    pub filter: String,
    pub layout: SourceLayout,
    pub fall: SeasonSheets,
    pub winter: SeasonSheets,
    pub spring: SeasonSheets,
    /// Sheet receiving the consolidated table.
    pub combined: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: "MATH".to_string(),
            layout: SourceLayout::default(),
            fall: SeasonSheets::defaults_for(Season::Fall),
            winter: SeasonSheets::defaults_for(Season::Winter),
            spring: SeasonSheets::defaults_for(Season::Spring),
            combined: "Combined Math".to_string(),
        }
    }
}

/// On-disk form of [`Config`], where every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    filter: Option<String>,
    layout: Option<SourceLayout>,
    fall: SeasonOverrides,
    winter: SeasonOverrides,
    spring: SeasonOverrides,
    combined: Option<String>,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let defaults = Config::default();
        Self {
            filter: file.filter.unwrap_or(defaults.filter),
            layout: file.layout.unwrap_or(defaults.layout),
            fall: file.fall.resolve(Season::Fall),
            winter: file.winter.resolve(Season::Winter),
            spring: file.spring.resolve(Season::Spring),
            combined: file.combined.unwrap_or(defaults.combined),
        }
    }
}

impl Config {
    /// Loads a JSON configuration file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn season(&self, season: Season) -> &SeasonSheets {
        match season {
            Season::Fall => &self.fall,
            Season::Winter => &self.winter,
            Season::Spring => &self.spring,
        }
    }

    /// Presence checks: names are filled in, offsets fit the span, no two
    /// outputs target the same sheet, and no output replaces a source sheet.
    pub fn validate(&self) -> Result<()> {
        if self.filter.trim().is_empty() {
            return Err(ToolError::InvalidConfig("filter must not be empty".into()));
        }

        for (name, offset) in self.layout.offsets() {
            if offset >= self.layout.span {
                return Err(ToolError::InvalidConfig(format!(
                    "{name} offset {offset} lies outside the {}-column span",
                    self.layout.span
                )));
            }
        }

        let mut outputs = HashSet::new();
        for season in Season::ALL {
            let sheets = self.season(season);
            for (kind, name) in [
                ("source", &sheets.source),
                ("destination", &sheets.destination),
                ("score header", &sheets.score_header),
            ] {
                if name.trim().is_empty() {
                    return Err(ToolError::InvalidConfig(format!(
                        "{season} {kind} must not be empty"
                    )));
                }
            }
            if !outputs.insert(sheets.destination.as_str()) {
                return Err(ToolError::InvalidConfig(format!(
                    "destination sheet '{}' is used more than once",
                    sheets.destination
                )));
            }
        }

        if self.combined.trim().is_empty() {
            return Err(ToolError::InvalidConfig(
                "combined sheet must not be empty".into(),
            ));
        }
        if !outputs.insert(self.combined.as_str()) {
            return Err(ToolError::InvalidConfig(format!(
                "combined sheet '{}' collides with a destination sheet",
                self.combined
            )));
        }

        for season in Season::ALL {
            let source = &self.season(season).source;
            if outputs.contains(source.as_str()) {
                return Err(ToolError::InvalidConfig(format!(
                    "{season} source sheet '{source}' would be overwritten by an output"
                )));
            }
        }

        Ok(())
    }
}
