//! SQLite destination and table loader

use crate::dataset::{Dataset, Value};
use crate::error::LoadError;
use crate::etl::Loader;

use eyre::Result;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql};
use std::path::PathBuf;

/// Where a destination database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

/// A relational destination addressed by a connection string
///
/// Accepts `sqlite:///relative.db`, `sqlite:////absolute.db`, `sqlite://`
/// (in-memory) or a bare file path. Every operation opens its own connection
/// and closes it before returning.
///
/// # Example
/// ```no_run
/// use sales_etl::storage::Destination;
///
/// # fn example() -> eyre::Result<()> {
/// let destination = Destination::parse("sqlite:///sales.db")?;
/// if destination.has_table("sales")? {
///     println!("already loaded");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Destination {
    url: String,
    location: Location,
}

impl Destination {
    pub fn parse(url: &str) -> Result<Self, LoadError> {
        let location = if let Some(rest) = url.strip_prefix("sqlite://") {
            match rest.strip_prefix('/') {
                _ if rest.is_empty() => Location::Memory,
                Some("") | Some(":memory:") => Location::Memory,
                Some(path) => Location::File(PathBuf::from(path)),
                // sqlite://host/... has no meaning for a file database
                None => return Err(LoadError::UnsupportedUrl(url.to_string())),
            }
        } else if url.contains("://") {
            return Err(LoadError::UnsupportedUrl(url.to_string()));
        } else if url == ":memory:" {
            Location::Memory
        } else {
            Location::File(PathBuf::from(url))
        };

        Ok(Self {
            url: url.to_string(),
            location,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Open a new connection
    ///
    /// In-memory destinations start empty on every connection.
    pub fn connect(&self) -> Result<Connection, LoadError> {
        let opened = match &self.location {
            Location::Memory => Connection::open_in_memory(),
            Location::File(path) => Connection::open(path),
        };
        opened.map_err(|source| LoadError::Connect {
            url: self.url.clone(),
            source,
        })
    }

    /// Names of all user tables, sorted
    pub fn table_names(&self) -> Result<Vec<String>, LoadError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    pub fn has_table(&self, table: &str) -> Result<bool, LoadError> {
        let conn = self.connect()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Read a whole table back into a [`Dataset`]
    ///
    /// Booleans come back as integers since SQLite stores them that way.
    /// BLOB cells are decoded as UTF-8 text, with invalid bytes replaced by
    /// `U+FFFD`, so binary data does not survive the trip.
    pub fn read_table(&self, table: &str) -> Result<Dataset, LoadError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_identifier(table)))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut dataset = Dataset::new(columns);
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => Value::Integer(n),
                    ValueRef::Real(x) => Value::Real(x),
                    ValueRef::Text(t) | ValueRef::Blob(t) => {
                        Value::Text(String::from_utf8_lossy(t).into_owned())
                    }
                });
            }
            dataset.push_row(values);
        }
        Ok(dataset)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Integer(n) => ToSqlOutput::from(*n),
            Value::Real(x) => ToSqlOutput::from(*x),
            Value::Boolean(b) => ToSqlOutput::from(*b),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// Double-quote an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Loader that replaces a table with the contents of a [`Dataset`]
///
/// The drop, create and inserts share one transaction, so a failed write
/// leaves whatever was there before.
pub struct TableLoader {
    destination: Destination,
    table: String,
}

impl TableLoader {
    pub fn new(destination: Destination, table: impl Into<String>) -> Self {
        Self {
            destination,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Drop and recreate the table, then insert every row
    ///
    /// Returns the number of rows written.
    pub fn write(&self, dataset: &Dataset) -> Result<usize, LoadError> {
        if dataset.column_count() == 0 {
            return Err(LoadError::EmptySchema(self.table.clone()));
        }

        let mut conn = self.destination.connect()?;
        let write_err = |source: rusqlite::Error| LoadError::Write {
            table: self.table.clone(),
            source,
        };

        let table = quote_identifier(&self.table);
        let column_defs = dataset
            .columns()
            .iter()
            .zip(dataset.column_types())
            .map(|(name, ty)| format!("{} {}", quote_identifier(name), ty.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");
        let column_list = dataset
            .columns()
            .iter()
            .map(|name| quote_identifier(name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; dataset.column_count()].join(", ");

        let tx = conn.transaction().map_err(write_err)?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({column_defs});"
        ))
        .map_err(write_err)?;
        {
            let mut insert = tx
                .prepare(&format!(
                    "INSERT INTO {table} ({column_list}) VALUES ({placeholders})"
                ))
                .map_err(write_err)?;
            for row in dataset.rows() {
                insert
                    .execute(rusqlite::params_from_iter(row.iter()))
                    .map_err(write_err)?;
            }
        }
        tx.commit().map_err(write_err)?;

        Ok(dataset.row_count())
    }
}

impl Loader for TableLoader {
    type Input = Dataset;

    fn load(&self, dataset: Self::Input) -> Result<usize> {
        let count = self
            .write(&dataset)
            .inspect_err(|e| log::error!("Load failed: {}", e))?;
        log::info!("Data loaded into DB successfully");
        Ok(count)
    }
}
