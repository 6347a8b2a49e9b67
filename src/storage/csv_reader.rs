//! Delimited text file extraction

use crate::dataset::{ColumnType, Dataset, Value};
use crate::error::ReadError;
use crate::etl::Extractor;

use eyre::Result;
use std::collections::HashSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Cell contents treated as a missing value
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "true", "TRUE"];
const FALSE_VALUES: &[&str] = &["False", "false", "FALSE"];

/// Read a CSV file with a header row into a [`Dataset`]
///
/// Column types are inferred from the data: a column whose present cells all
/// parse as integers holds [`Value::Integer`], and so on through reals and
/// booleans down to text. Cells matching [`NA_VALUES`] become [`Value::Null`].
///
/// # Example
/// ```no_run
/// use sales_etl::storage::CsvExtractor;
///
/// # fn example() -> eyre::Result<()> {
/// let dataset = CsvExtractor::new("data/raw/sales.csv").read()?;
/// println!("{} rows", dataset.row_count());
/// # Ok(())
/// # }
/// ```
pub struct CsvExtractor {
    path: PathBuf,
    delimiter: u8,
}

impl CsvExtractor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Use a field delimiter other than `,`
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the whole file
    pub fn read(&self) -> Result<Dataset, ReadError> {
        let file = File::open(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ReadError::NotFound(self.path.clone()),
            _ => ReadError::Io {
                path: self.path.clone(),
                source,
            },
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| self.csv_error(e))?,
            None => return Err(ReadError::Empty(self.path.clone())),
        };
        let columns = header_names(header.iter());

        let mut cells: Vec<Vec<Option<String>>> = Vec::new();
        for record in records {
            let record = record.map_err(|e| self.csv_error(e))?;
            if record.len() > columns.len() {
                return Err(ReadError::TooManyFields {
                    path: self.path.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            cells.push(
                record
                    .iter()
                    .map(|field| (!NA_VALUES.contains(&field)).then(|| field.to_string()))
                    .collect(),
            );
        }

        let types: Vec<ColumnType> = (0..columns.len())
            .map(|i| {
                infer_text_column(
                    cells
                        .iter()
                        .filter_map(|row| row.get(i).and_then(|c| c.as_deref())),
                )
            })
            .collect();

        let mut dataset = Dataset::new(columns);
        for row in cells {
            let values = row
                .into_iter()
                .zip(&types)
                .map(|(cell, ty)| cell.map_or(Value::Null, |text| typed_value(text, *ty)))
                .collect();
            dataset.push_row(values);
        }
        Ok(dataset)
    }

    fn csv_error(&self, source: csv::Error) -> ReadError {
        ReadError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl Extractor for CsvExtractor {
    type Output = Dataset;

    fn extract(&self) -> Result<Self::Output> {
        let dataset = self
            .read()
            .inspect_err(|e| log::error!("Extraction failed: {}", e))?;
        log::info!(
            "Extracted {} rows from {}",
            dataset.row_count(),
            self.path.display()
        );
        Ok(dataset)
    }
}

/// Header labels with blanks named `Unnamed: {i}` and repeats suffixed `.1`, `.2`, ...
fn header_names<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (index, field) in fields.enumerate() {
        let base = if field.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            field.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&text) {
        Some(true)
    } else if FALSE_VALUES.contains(&text) {
        Some(false)
    } else {
        None
    }
}

/// Narrowest column type every present cell parses as
fn infer_text_column<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnType {
    if cells.clone().all(|c| c.parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if cells.clone().all(|c| c.parse::<f64>().is_ok()) {
        ColumnType::Real
    } else if cells.clone().all(|c| parse_bool(c).is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

fn typed_value(text: String, ty: ColumnType) -> Value {
    let parsed = match ty {
        ColumnType::Integer => text.parse().ok().map(Value::Integer),
        // NAN, Nan, +nan and friends parse as floats but are missing values
        ColumnType::Real => text
            .parse::<f64>()
            .ok()
            .map(|x| if x.is_nan() { Value::Null } else { Value::Real(x) }),
        ColumnType::Boolean => parse_bool(&text).map(Value::Boolean),
        ColumnType::Text => None,
    };
    parsed.unwrap_or(Value::Text(text))
}
