use crate::{OraMetaError, Result};
use serde::Serialize;
use std::future::Future;
use tracing::{debug, instrument, warn};

/// The default number of rows fetched by a single catalog query.
pub const DEFAULT_FETCH_ROWS: usize = 100_000;

/// A single value returned by the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CatalogValue {
    fn kind(&self) -> &'static str {
        match self {
            CatalogValue::Null => "null",
            CatalogValue::Integer(_) => "integer",
            CatalogValue::Float(_) => "float",
            CatalogValue::Text(_) => "text",
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        CatalogValue::Text(value.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(value: String) -> Self {
        CatalogValue::Text(value)
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        CatalogValue::Integer(value)
    }
}

impl From<i32> for CatalogValue {
    fn from(value: i32) -> Self {
        CatalogValue::Integer(value as i64)
    }
}

impl From<f64> for CatalogValue {
    fn from(value: f64) -> Self {
        CatalogValue::Float(value)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => CatalogValue::Null,
        }
    }
}

/// How field names of fetched rows are normalized before they are mapped.
///
/// Oracle reports unquoted aliases in upper case, the row mappers in this crate
/// look fields up by their lower case name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FieldNaming {
    #[default]
    Lowercase,
    Preserve,
}

impl FieldNaming {
    pub fn apply(&self, name: &str) -> String {
        match self {
            FieldNaming::Lowercase => name.to_lowercase(),
            FieldNaming::Preserve => name.to_string(),
        }
    }
}

/// A fetched row, as an ordered list of named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRow {
    fields: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CatalogValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<CatalogValue>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&CatalogValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn try_get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name).ok_or_else(|| OraMetaError::ColumnNotFound {
            column: name.to_string(),
        })?;

        T::from_value(value).ok_or_else(|| OraMetaError::UnexpectedValueType {
            column: name.to_string(),
            expected: T::EXPECTED,
            actual: value.kind(),
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renames every field according to `naming`.
    pub fn with_naming(mut self, naming: FieldNaming) -> Self {
        if naming != FieldNaming::Preserve {
            for (name, _) in self.fields.iter_mut() {
                *name = naming.apply(name);
            }
        }
        self
    }
}

impl<N: Into<String>, V: Into<CatalogValue>> FromIterator<(N, V)> for CatalogRow {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        CatalogRow {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Conversion from a driver value into a rust value.
pub trait FromValue: Sized {
    /// Describes the accepted value, used in error messages.
    const EXPECTED: &'static str;

    fn from_value(value: &CatalogValue) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: &CatalogValue) -> Option<Self> {
        match value {
            CatalogValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &CatalogValue) -> Option<Self> {
        match value {
            CatalogValue::Integer(i) => Some(*i),
            CatalogValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            // Some drivers hand out NUMBER columns as text to keep their precision
            CatalogValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "integer flag";

    fn from_value(value: &CatalogValue) -> Option<Self> {
        i64::from_value(value).map(|i| i != 0)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &CatalogValue) -> Option<Self> {
        match value {
            CatalogValue::Null => Some(None),
            v => T::from_value(v).map(Some),
        }
    }
}

pub trait FromRow: Sized {
    fn from_row(row: CatalogRow) -> Result<Self>;
}

impl FromRow for CatalogRow {
    fn from_row(row: CatalogRow) -> Result<Self> {
        Ok(row)
    }
}

/// A rendered query together with its positional bind values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<CatalogValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// The maximum number of rows to fetch.
    pub max_rows: usize,
    /// How field names are normalized before rows are mapped.
    pub naming: FieldNaming,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_FETCH_ROWS,
            naming: FieldNaming::Lowercase,
        }
    }
}

/// The database driver seam.
///
/// Implementations execute a statement against Oracle, binding `statement.binds`
/// to the placeholders `:1`, `:2`, ... in order, and return the rows as named fields.
/// Implementations should stop fetching after `options.max_rows` rows.
pub trait CatalogConnection {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_rows(
        &self,
        statement: &SqlStatement,
        options: &FetchOptions,
    ) -> impl Future<Output = std::result::Result<Vec<CatalogRow>, Self::Error>>;
}

/// Executes `statement` and maps every returned row with [`FromRow`].
#[instrument(skip_all)]
pub async fn get_results<C, T>(
    connection: &C,
    statement: &SqlStatement,
    options: &FetchOptions,
) -> Result<Vec<T>>
where
    C: CatalogConnection,
    T: FromRow,
{
    let mut rows = connection
        .fetch_rows(statement, options)
        .await
        .map_err(|e| OraMetaError::query_failed(&statement.sql, e))?;

    if rows.len() > options.max_rows {
        warn!(
            returned = rows.len(),
            max_rows = options.max_rows,
            "Driver returned more rows than requested, discarding the rest"
        );
        rows.truncate(options.max_rows);
    }

    let mut output = Vec::with_capacity(rows.len());

    for row in rows.into_iter() {
        output.push(T::from_row(row.with_naming(options.naming))?);
    }

    debug!(rows = output.len(), "Fetched catalog rows");

    Ok(output)
}
