//! CLI helper functions
//!
//! Wires the configured CSV source, normalizer and table loader together and
//! runs them only when the destination table is missing.

use crate::{
    config::Config,
    etl::{Extractor, Loader, Pipeline, Transformer},
    storage::{CsvExtractor, Destination, TableLoader},
    transform::ColumnNormalizer,
};
use eyre::Result;

/// What a sync run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The table already existed, nothing ran
    Skipped,
    /// The pipeline ran and wrote this many rows
    Loaded { rows: usize },
}

/// Run `pipeline` unless `table` already exists in `destination`
///
/// Only the presence of the table is checked, never its contents or
/// schema. The check and the load use separate connections and are not
/// atomic: two concurrent runs may both load.
///
/// # Errors
/// Returns the existence-check error or the first failing stage's error
pub fn sync_table<E, T, L>(
    destination: &Destination,
    table: &str,
    pipeline: &Pipeline<E, T, L>,
) -> Result<SyncOutcome>
where
    E: Extractor,
    T: Transformer<Input = E::Output>,
    L: Loader<Input = T::Output>,
{
    let exists = destination
        .has_table(table)
        .inspect_err(|e| log::error!("Failed to inspect destination: {}", e))?;

    if exists {
        log::info!("Table '{}' already exists. Skipping ETL.", table);
        return Ok(SyncOutcome::Skipped);
    }

    log::info!("Table '{}' not found. Creating and loading data...", table);
    let rows = pipeline.run()?;
    Ok(SyncOutcome::Loaded { rows })
}

/// Create and load the sales table from the configured CSV if it is missing
///
/// Pipeline: CsvExtractor → ColumnNormalizer → TableLoader
pub fn init_db(config: &Config) -> Result<SyncOutcome> {
    let destination = Destination::parse(&config.db_url)
        .inspect_err(|e| log::error!("Invalid destination: {}", e))?;

    let pipeline = Pipeline::new(
        CsvExtractor::new(&config.raw_data_path),
        ColumnNormalizer,
        TableLoader::new(destination.clone(), &config.table),
    );

    sync_table(&destination, &config.table, &pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use tempfile::TempDir;

    #[test]
    fn test_init_db_rejects_unsupported_url() {
        let config = Config::new("mysql://localhost/sales", "sales.csv");
        let err = init_db(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedUrl(_))
        ));
    }

    #[test]
    fn test_init_db_loads_then_skips() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("sales.csv");
        std::fs::write(&csv, "Order ID,Amount\n1,2.5\n2,\n3,4.0\n").unwrap();
        let db = dir.path().join("sales.db");
        let config = Config::new(format!("sqlite:///{}", db.display()), &csv);

        assert_eq!(init_db(&config).unwrap(), SyncOutcome::Loaded { rows: 2 });
        assert_eq!(init_db(&config).unwrap(), SyncOutcome::Skipped);
    }
}
