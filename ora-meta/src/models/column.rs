use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// Zero based position of the column, in the order the catalog returned it.
    pub column_index: usize,
    pub data_type: String,
    pub data_type_mean: DataTypeMean,
    pub data_length: Option<i64>,
    pub data_precision: Option<i64>,
    pub data_scale: Option<i64>,
    pub char_length: Option<i64>,
    pub default_value: Option<String>,
    #[serde(serialize_with = "serialize_flag")]
    pub is_notnull: bool,
    pub column_comments: Option<String>,
}

fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// The general category of an Oracle data type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DataTypeMean {
    Char,
    Clob,
    Varchar,
    Buffer,
    Timestamp,
    /// A type without a more general category, kept as the catalog reports it.
    Other(String),
}

impl DataTypeMean {
    /// Finds the category of `data_type`, if it has one.
    ///
    /// Every `TIMESTAMP...` variant (fractional precision, time zones) is a timestamp.
    pub fn classify(data_type: &str) -> Option<DataTypeMean> {
        if data_type.starts_with("TIMESTAMP") {
            return Some(DataTypeMean::Timestamp);
        }

        match data_type {
            "NCHAR" => Some(DataTypeMean::Char),
            "NCLOB" => Some(DataTypeMean::Clob),
            "VARCHAR2" | "NVARCHAR2" | "LONG" | "ROWID" | "UROWID" => Some(DataTypeMean::Varchar),
            "LONG RAW" | "BINARY_FLOAT" | "BINARY_DOUBLE" => Some(DataTypeMean::Buffer),
            _ => None,
        }
    }

    pub fn from_data_type(data_type: &str) -> DataTypeMean {
        Self::classify(data_type).unwrap_or_else(|| DataTypeMean::Other(data_type.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataTypeMean::Char => "CHAR",
            DataTypeMean::Clob => "CLOB",
            DataTypeMean::Varchar => "VARCHAR",
            DataTypeMean::Buffer => "BUFFER",
            DataTypeMean::Timestamp => "TIMESTAMP",
            DataTypeMean::Other(s) => s,
        }
    }
}

impl Display for DataTypeMean {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataTypeMean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Columns of a table by name, in catalog order.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ColumnMap {
    columns: Vec<(String, ColumnInfo)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a column. A column that already exists keeps its position and gets the new info.
    pub fn insert(&mut self, name: String, info: ColumnInfo) {
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = info,
            None => self.columns.push((name, info)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, info)| info)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnInfo)> {
        self.columns.iter().map(|(n, info)| (n.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for ColumnMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, info) in &self.columns {
            map.serialize_entry(name, info)?;
        }
        map.end()
    }
}
