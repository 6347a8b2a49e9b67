//! Sales ETL
//!
//! Loads a CSV file into a SQL table once: normalize the columns, drop
//! incomplete rows, and skip everything if the table is already there.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod etl;
pub mod logging;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use cli::{SyncOutcome, init_db, sync_table};
pub use config::{Config, LogConfig, SALES_TABLE};
pub use dataset::{ColumnType, Dataset, Value};
pub use error::{LoadError, ReadError, TransformError};
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use storage::{CsvExtractor, Destination, TableLoader};
pub use transform::ColumnNormalizer;
