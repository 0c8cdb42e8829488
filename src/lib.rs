//! Core library for the roster-tools command line application.
//!
//! The library exposes the seasonal and combined sheet transforms that power
//! the command-line interface as well as the tests. Table access lives under
//! [`io`], cell and record types inside [`model`], the per-season filter in
//! [`seasonal`], the cross-season merge in [`consolidate`], and the
//! workbook-level entry points under [`actions`].

pub mod actions;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod seasonal;

pub use config::Config;
pub use error::{Result, ToolError};
