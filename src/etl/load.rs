//! Loader trait for writing data to destinations

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// Implementors define how to persist a value:
/// - Database tables
/// - File systems
///
/// # Example
/// ```no_run
/// use sales_etl::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LinesWriter {
///     path: PathBuf,
/// }
///
/// impl Loader for LinesWriter {
///     type Input = Vec<String>;
///
///     fn load(&self, lines: Self::Input) -> Result<usize> {
///         std::fs::write(&self.path, lines.join("\n"))?;
///         Ok(lines.len())
///     }
/// }
/// ```
pub trait Loader {
    /// The type of value to load
    type Input;

    /// Load the value to the destination
    ///
    /// Returns the number of rows or items written
    ///
    /// # Errors
    /// Returns an error if loading fails (connection, permissions, schema, etc.)
    fn load(&self, input: Self::Input) -> Result<usize>;
}
