//! Extractor trait for reading data out of a source

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to produce a value from sources like:
/// - CSV files
/// - Database tables
/// - In-memory fixtures for tests
///
/// # Example
/// ```no_run
/// use sales_etl::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineCounter {
///     path: PathBuf,
/// }
///
/// impl Extractor for LineCounter {
///     type Output = usize;
///
///     fn extract(&self) -> Result<Self::Output> {
///         Ok(std::fs::read_to_string(&self.path)?.lines().count())
///     }
/// }
/// ```
pub trait Extractor {
    /// The type of value extracted
    type Output;

    /// Extract the value from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, etc.)
    fn extract(&self) -> Result<Self::Output>;
}
