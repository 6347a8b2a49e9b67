//! Column normalizer transformer
//!
//! Cleans up a freshly extracted dataset: column labels become
//! `lower_snake` style and incomplete rows are dropped.

use crate::dataset::Dataset;
use crate::error::TransformError;
use crate::etl::Transformer;

use eyre::Result;
use std::collections::HashMap;

/// Trim, lowercase, and replace spaces with underscores
///
/// # Example
/// ```
/// use sales_etl::transform::normalize_column_name;
///
/// assert_eq!(normalize_column_name(" Order ID "), "order_id");
/// assert_eq!(normalize_column_name("Unit Price"), "unit_price");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Transformer that normalizes column labels and drops rows with missing values
///
/// Column order and the relative order of surviving rows are kept.
///
/// # Example
/// ```
/// use sales_etl::dataset::{Dataset, Value};
/// use sales_etl::transform::ColumnNormalizer;
///
/// let dataset = Dataset::with_rows(
///     vec![" Order ID ".into(), "Region".into()],
///     vec![
///         vec![Value::Integer(1), "north".into()],
///         vec![Value::Integer(2), Value::Null],
///     ],
/// );
///
/// let cleaned = ColumnNormalizer.apply(dataset).unwrap();
/// assert_eq!(cleaned.columns(), ["order_id", "region"]);
/// assert_eq!(cleaned.row_count(), 1);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn apply(&self, mut dataset: Dataset) -> Result<Dataset, TransformError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for (index, original) in dataset.columns().iter().enumerate() {
            let normalized = normalize_column_name(original);
            if normalized.is_empty() {
                return Err(TransformError::EmptyColumnName { index });
            }
            if let Some(other) = seen.insert(normalized.clone(), original) {
                return Err(TransformError::DuplicateColumn {
                    original: other.to_string(),
                    other: original.clone(),
                    normalized,
                });
            }
        }

        dataset.rename_columns(normalize_column_name);
        let dropped = dataset.drop_nulls();
        log::debug!("Dropped {} rows with missing values", dropped);
        Ok(dataset)
    }
}

impl Transformer for ColumnNormalizer {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let dataset = self
            .apply(input)
            .inspect_err(|e| log::error!("Transformation failed: {}", e))?;
        log::info!("Transformed dataset, now {} rows", dataset.row_count());
        Ok(dataset)
    }
}
