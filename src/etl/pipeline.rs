//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// ETL Pipeline that chains Extract, Transform, and Load stages
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Output)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```
/// use sales_etl::etl::{Extractor, Loader, Pipeline, Transformer};
/// # use eyre::Result;
/// # struct Numbers;
/// # impl Extractor for Numbers {
/// #     type Output = Vec<i32>;
/// #     fn extract(&self) -> Result<Self::Output> { Ok(vec![1, 2, 3]) }
/// # }
/// # struct Double;
/// # impl Transformer for Double {
/// #     type Input = Vec<i32>;
/// #     type Output = Vec<i32>;
/// #     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
/// #         Ok(input.into_iter().map(|n| n * 2).collect())
/// #     }
/// # }
/// # struct Count;
/// # impl Loader for Count {
/// #     type Input = Vec<i32>;
/// #     fn load(&self, input: Self::Input) -> Result<usize> { Ok(input.len()) }
/// # }
///
/// # fn example() -> Result<()> {
/// let pipeline = Pipeline::new(Numbers, Double, Count);
///
/// let count = pipeline.run()?;
/// assert_eq!(count, 3);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Output>,
    L: Loader<Input = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract from source
    /// 2. Transform the extracted value
    /// 3. Load the result to the destination
    ///
    /// Returns the count reported by the loader
    ///
    /// # Errors
    /// Returns the first stage error; later stages are not run
    pub fn run(&self) -> Result<usize> {
        log::debug!("Starting ETL pipeline");

        log::debug!("Extracting from source...");
        let extracted = self.extractor.extract()?;

        log::debug!("Transforming...");
        let transformed = self.transformer.transform(extracted)?;

        log::debug!("Loading to destination...");
        let count = self.loader.load(transformed)?;

        log::debug!("ETL pipeline finished, {} rows loaded", count);
        Ok(count)
    }
}
