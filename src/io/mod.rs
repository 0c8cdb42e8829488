pub mod excel_read;
pub mod excel_write;
pub mod store;
pub mod workbook;

pub use store::{MemoryStore, TableStore};
pub use workbook::WorkbookStore;
