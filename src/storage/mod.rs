//! Source and destination storage
//!
//! This module handles the I/O ends of the pipeline:
//! - CSV file reading
//! - SQLite destinations and table loading

mod csv_reader;
mod sqlite;

pub use csv_reader::{CsvExtractor, NA_VALUES};
pub use sqlite::{Destination, Location, TableLoader, quote_identifier};
