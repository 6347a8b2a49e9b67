//! Integration tests for the CSV → SQLite sync
//!
//! These tests run the real extractor, normalizer and loader against
//! temporary files and databases.

use eyre::Result;
use sales_etl::etl::{Extractor, Loader, Pipeline, Transformer};
use sales_etl::{
    ColumnNormalizer, Config, CsvExtractor, Dataset, Destination, ReadError, SALES_TABLE,
    SyncOutcome, TableLoader, Value, init_db, sync_table,
};
use std::cell::Cell;
use std::path::PathBuf;
use tempfile::TempDir;

const SALES_CSV: &str = "\
 Order ID ,Customer Name,Region,Unit Price,Quantity
1001,Alice,North,9.99,3
1002,Bob,,4.50,1
1003,Carol,South,12.00,
1004,Dan,East,1.25,10
1005,Eve,West,NA,2
1006,Frank,North,7.00,4
";

struct Project {
    _dir: TempDir,
    csv: PathBuf,
    db: PathBuf,
}

impl Project {
    fn new(csv: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let csv_path = dir.path().join("sales.csv");
        std::fs::write(&csv_path, csv)?;
        let db = dir.path().join("warehouse.db");
        Ok(Self {
            _dir: dir,
            csv: csv_path,
            db,
        })
    }

    fn url(&self) -> String {
        format!("sqlite:///{}", self.db.display())
    }

    fn config(&self) -> Config {
        Config::new(self.url(), &self.csv)
    }

    fn destination(&self) -> Destination {
        Destination::parse(&self.url()).unwrap()
    }
}

/// Wraps a stage and counts how often it runs
struct Counted<S> {
    inner: S,
    calls: Cell<usize>,
}

impl<S> Counted<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<S: Extractor> Extractor for &Counted<S> {
    type Output = S::Output;
    fn extract(&self) -> Result<Self::Output> {
        self.calls.set(self.calls.get() + 1);
        self.inner.extract()
    }
}

impl<S: Transformer> Transformer for &Counted<S> {
    type Input = S::Input;
    type Output = S::Output;
    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.calls.set(self.calls.get() + 1);
        self.inner.transform(input)
    }
}

impl<S: Loader> Loader for &Counted<S> {
    type Input = S::Input;
    fn load(&self, input: Self::Input) -> Result<usize> {
        self.calls.set(self.calls.get() + 1);
        self.inner.load(input)
    }
}

fn counted_stages(
    project: &Project,
) -> (
    Counted<CsvExtractor>,
    Counted<ColumnNormalizer>,
    Counted<TableLoader>,
) {
    (
        Counted::new(CsvExtractor::new(&project.csv)),
        Counted::new(ColumnNormalizer),
        Counted::new(TableLoader::new(project.destination(), SALES_TABLE)),
    )
}

#[test]
fn test_second_run_skips_every_stage() -> Result<()> {
    let project = Project::new(SALES_CSV)?;
    let destination = project.destination();
    let (extractor, transformer, loader) = counted_stages(&project);
    let pipeline = Pipeline::new(&extractor, &transformer, &loader);

    let first = sync_table(&destination, SALES_TABLE, &pipeline)?;
    assert_eq!(first, SyncOutcome::Loaded { rows: 3 });

    let second = sync_table(&destination, SALES_TABLE, &pipeline)?;
    assert_eq!(second, SyncOutcome::Skipped);

    assert_eq!(extractor.calls.get(), 1);
    assert_eq!(transformer.calls.get(), 1);
    assert_eq!(loader.calls.get(), 1);
    Ok(())
}

#[test]
fn test_existing_table_left_untouched() -> Result<()> {
    let project = Project::new(SALES_CSV)?;
    let destination = project.destination();
    destination
        .connect()?
        .execute_batch("CREATE TABLE sales (note TEXT); INSERT INTO sales VALUES ('keep');")?;

    assert_eq!(init_db(&project.config())?, SyncOutcome::Skipped);

    let table = destination.read_table(SALES_TABLE)?;
    assert_eq!(table.columns(), ["note"]);
    assert_eq!(table.rows(), [vec![Value::Text("keep".to_string())]]);
    Ok(())
}

#[test]
fn test_loaded_table_has_normalized_columns_and_complete_rows() -> Result<()> {
    let project = Project::new(SALES_CSV)?;

    let outcome = init_db(&project.config())?;
    assert_eq!(outcome, SyncOutcome::Loaded { rows: 3 });

    let table = project.destination().read_table(SALES_TABLE)?;
    assert_eq!(
        table.columns(),
        ["order_id", "customer_name", "region", "unit_price", "quantity"]
    );
    assert_eq!(table.row_count(), 3);
    assert!(table.rows().iter().flatten().all(|v| !v.is_null()));

    let ids: Vec<_> = table.column("order_id").unwrap();
    assert_eq!(
        ids,
        vec![
            &Value::Integer(1001),
            &Value::Integer(1004),
            &Value::Integer(1006)
        ]
    );
    let prices = table.column("unit_price").unwrap();
    assert_eq!(prices[1], &Value::Real(1.25));
    Ok(())
}

#[test]
fn test_round_trip_row_count() -> Result<()> {
    let project = Project::new(SALES_CSV)?;

    let extracted = CsvExtractor::new(&project.csv).extract()?;
    assert_eq!(extracted.row_count(), 6);

    let transformed = ColumnNormalizer.transform(extracted)?;
    let rows = transformed.row_count();

    let loader = TableLoader::new(project.destination(), SALES_TABLE);
    assert_eq!(loader.load(transformed.clone())?, rows);

    let back = project.destination().read_table(SALES_TABLE)?;
    assert_eq!(back.row_count(), rows);
    assert_eq!(back.columns(), transformed.columns());
    Ok(())
}

#[test]
fn test_missing_source_never_loads() -> Result<()> {
    let project = Project::new(SALES_CSV)?;
    std::fs::remove_file(&project.csv)?;

    let destination = project.destination();
    let (extractor, transformer, loader) = counted_stages(&project);
    let pipeline = Pipeline::new(&extractor, &transformer, &loader);

    let err = sync_table(&destination, SALES_TABLE, &pipeline).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReadError>(),
        Some(ReadError::NotFound(_))
    ));

    assert_eq!(extractor.calls.get(), 1);
    assert_eq!(transformer.calls.get(), 0);
    assert_eq!(loader.calls.get(), 0);
    assert!(!destination.has_table(SALES_TABLE)?);
    Ok(())
}

#[test]
fn test_load_replaces_old_schema_and_rows() -> Result<()> {
    let project = Project::new(SALES_CSV)?;
    let destination = project.destination();
    destination.connect()?.execute_batch(
        "CREATE TABLE sales (legacy_id INTEGER, legacy_note TEXT);
         INSERT INTO sales VALUES (1, 'a'), (2, 'b'), (3, 'c'), (4, 'd'), (5, 'e');",
    )?;

    let dataset = Dataset::with_rows(
        vec!["sku".into(), "qty".into()],
        vec![vec!["A-1".into(), Value::Integer(2)]],
    );
    TableLoader::new(destination.clone(), SALES_TABLE).load(dataset)?;

    let table = destination.read_table(SALES_TABLE)?;
    assert_eq!(table.columns(), ["sku", "qty"]);
    assert_eq!(
        table.rows(),
        [vec![Value::Text("A-1".to_string()), Value::Integer(2)]]
    );
    assert_eq!(destination.table_names()?, vec![SALES_TABLE]);
    Ok(())
}

#[test]
fn test_header_only_file_creates_empty_table() -> Result<()> {
    let project = Project::new("Order ID,Amount\n")?;

    assert_eq!(
        init_db(&project.config())?,
        SyncOutcome::Loaded { rows: 0 }
    );

    let table = project.destination().read_table(SALES_TABLE)?;
    assert_eq!(table.columns(), ["order_id", "amount"]);
    assert!(table.is_empty());
    Ok(())
}

#[test]
fn test_nan_cells_dropped_before_load() -> Result<()> {
    let project = Project::new("id,amount\n1,2.5\n2,NAN\n3,Nan\n")?;

    assert_eq!(
        init_db(&project.config())?,
        SyncOutcome::Loaded { rows: 1 }
    );

    let table = project.destination().read_table(SALES_TABLE)?;
    assert!(table.rows().iter().flatten().all(|v| !v.is_null()));
    assert_eq!(
        table.rows(),
        [vec![Value::Integer(1), Value::Real(2.5)]]
    );
    Ok(())
}

#[test]
fn test_unwritable_destination_fails_load() -> Result<()> {
    let project = Project::new(SALES_CSV)?;
    let missing = project.db.with_file_name("missing").join("warehouse.db");
    let config = Config::new(missing.display().to_string(), &project.csv);

    let err = init_db(&config).unwrap_err();
    assert!(err.downcast_ref::<sales_etl::LoadError>().is_some());
    Ok(())
}
