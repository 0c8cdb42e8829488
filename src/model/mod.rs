use std::fmt;

/// A single row of cells as read from, or written to, a sheet.
pub type Row = Vec<Cell>;

/// Represents the value held by one spreadsheet cell.
///
/// Every flavour of "nothing here" (a missing cell, an explicit empty cell, an
/// empty string) collapses into [`Cell::Blank`] so the transforms only ever
/// test for one sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Missing, empty, or empty-string value.
    #[default]
    Blank,
    /// Non-empty string value.
    Text(String),
    /// Numeric value. Integers read from the workbook land here as well.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Date or date-time, as an Excel serial day number.
    DateTime(f64),
    /// Elapsed time, as an Excel serial day fraction.
    Duration(f64),
    /// Formula error such as `#N/A`, kept as its displayed code.
    Error(String),
}

impl Cell {
    /// Builds a text cell, normalising the empty string to [`Cell::Blank`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Blank
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }

    /// Renders the cell the way it is displayed in a sheet.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Blank => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) | Cell::DateTime(value) | Cell::Duration(value) => {
                value.to_string()
            }
            Cell::Bool(value) => value.to_string(),
            Cell::Error(code) => code.clone(),
        }
    }

    /// Normalised form used for case-insensitive comparisons.
    fn sort_key(&self) -> String {
        self.to_text().to_lowercase()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Assessment window a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Fall,
    Winter,
    Spring,
}

impl Season {
    /// Every season in consolidation order.
    pub const ALL: [Season; 3] = [Season::Fall, Season::Winter, Season::Spring];

    /// Position of the season's score slot in a consolidated record.
    pub fn index(self) -> usize {
        match self {
            Season::Fall => 0,
            Season::Winter => 1,
            Season::Spring => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records that carry a student name and can therefore be ordered by it.
pub trait NamedRecord {
    fn last_name(&self) -> &Cell;
    fn first_name(&self) -> &Cell;
}

/// Orders records by last name, then first name, ignoring case. Records with
/// equal names keep their relative input order.
pub fn sort_by_name<T: NamedRecord>(records: Vec<T>) -> Vec<T> {
    let mut keyed: Vec<(String, String, T)> = records
        .into_iter()
        .map(|record| {
            (
                record.last_name().sort_key(),
                record.first_name().sort_key(),
                record,
            )
        })
        .collect();
    keyed.sort_by(|(lhs_last, lhs_first, _), (rhs_last, rhs_first, _)| {
        lhs_last.cmp(rhs_last).then_with(|| lhs_first.cmp(rhs_first))
    });
    keyed.into_iter().map(|(_, _, record)| record).collect()
}

/// One row of a seasonal destination sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRow {
    pub identifier: Cell,
    pub last_name: Cell,
    pub first_name: Cell,
    pub subject: Cell,
    pub grade: Cell,
    pub score: Cell,
}

impl FilteredRow {
    /// Cells in destination column order.
    pub fn into_row(self) -> Row {
        vec![
            self.identifier,
            self.last_name,
            self.first_name,
            self.subject,
            self.grade,
            self.score,
        ]
    }
}

impl NamedRecord for FilteredRow {
    fn last_name(&self) -> &Cell {
        &self.last_name
    }

    fn first_name(&self) -> &Cell {
        &self.first_name
    }
}

/// One row of the combined sheet: a student's subject across all seasons.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedRecord {
    pub identifier: Cell,
    pub subject: Cell,
    pub first_name: Cell,
    pub last_name: Cell,
    pub grade: Cell,
    /// Score per season, indexed by [`Season::index`].
    pub scores: [Cell; 3],
}

impl ConsolidatedRecord {
    /// Creates a record with blank names, grade, and scores.
    pub fn new(identifier: Cell, subject: Cell) -> Self {
        Self {
            identifier,
            subject,
            first_name: Cell::Blank,
            last_name: Cell::Blank,
            grade: Cell::Blank,
            scores: Default::default(),
        }
    }

    /// Cells in combined column order.
    pub fn into_row(self) -> Row {
        let [fall, winter, spring] = self.scores;
        vec![
            self.first_name,
            self.last_name,
            self.identifier,
            self.subject,
            self.grade,
            fall,
            winter,
            spring,
        ]
    }
}

impl NamedRecord for ConsolidatedRecord {
    fn last_name(&self) -> &Cell {
        &self.last_name
    }

    fn first_name(&self) -> &Cell {
        &self.first_name
    }
}
