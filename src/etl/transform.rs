//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming extracted data
///
/// Implementors define how to reshape a value between extraction and load:
/// - Data cleaning (dropping incomplete rows)
/// - Renaming (normalizing column labels)
/// - Format conversion
///
/// # Example
/// ```
/// use sales_etl::etl::Transformer;
/// use eyre::Result;
///
/// struct Uppercase;
///
/// impl Transformer for Uppercase {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// assert_eq!(Uppercase.transform("abc".to_string()).unwrap(), "ABC");
/// ```
pub trait Transformer {
    /// Input type
    type Input;

    /// Output type after transformation
    type Output;

    /// Transform a single value
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}
