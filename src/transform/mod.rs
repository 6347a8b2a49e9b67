//! Transform implementations for extracted datasets

mod column_normalizer;

pub use column_normalizer::{ColumnNormalizer, normalize_column_name};
