use crate::error::Result;
use crate::model::{Cell, Row};

/// Table storage consumed by the transforms.
///
/// A table is addressed by name and holds its header as the first row.
pub trait TableStore {
    /// Returns every row of the named table, header included, or `None` when
    /// no such table exists.
    fn read_table(&self, name: &str) -> Result<Option<Vec<Row>>>;

    /// Replaces the named table with `header` followed by `rows`, creating it
    /// when absent. Nothing previously stored under `name` survives.
    fn write_table(&mut self, name: &str, header: &[String], rows: Vec<Row>) -> Result<()>;
}

/// Order-preserving in-memory table store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    sheets: Vec<(String, Vec<Row>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a sheet verbatim, header included.
    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing_rows)) => *existing_rows = rows,
            None => self.sheets.push((name, rows)),
        }
    }

    /// Returns the named sheet's rows without copying them.
    pub fn sheet(&self, name: &str) -> Option<&[Row]> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rows)| rows.as_slice())
    }

    /// Iterates sheets in workbook order.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.sheets
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl TableStore for MemoryStore {
    fn read_table(&self, name: &str) -> Result<Option<Vec<Row>>> {
        Ok(self.sheet(name).map(<[Row]>::to_vec))
    }

    fn write_table(&mut self, name: &str, header: &[String], rows: Vec<Row>) -> Result<()> {
        let mut table = Vec::with_capacity(rows.len() + 1);
        table.push(header.iter().map(|label| Cell::text(label.as_str())).collect());
        table.extend(rows);
        self.insert_sheet(name, table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.read_table("Fall Data").unwrap(), None);
    }

    #[test]
    fn write_replaces_previous_contents_in_place() {
        let mut store = MemoryStore::new();
        store.insert_sheet("First", vec![vec![Cell::from("a")]]);
        store.insert_sheet(
            "Target",
            vec![vec![Cell::from("old"); 9], vec![Cell::from("stale"); 9]],
        );
        store.insert_sheet("Last", Vec::new());

        store
            .write_table("Target", &["A".to_string(), "B".to_string()], Vec::new())
            .unwrap();

        assert_eq!(store.sheet_names(), vec!["First", "Target", "Last"]);
        assert_eq!(
            store.sheet("Target").unwrap(),
            &[vec![Cell::from("A"), Cell::from("B")]]
        );
    }

    #[test]
    fn write_creates_missing_table_at_the_end() {
        let mut store = MemoryStore::new();
        store.insert_sheet("First", Vec::new());
        store
            .write_table("New", &["H".to_string()], vec![vec![Cell::Number(1.0)]])
            .unwrap();

        assert_eq!(store.sheet_names(), vec!["First", "New"]);
        assert_eq!(store.read_table("New").unwrap().unwrap().len(), 2);
    }
}
