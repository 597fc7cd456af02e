use crate::models::{ColumnMap, ForeignKeyInfo, PrimaryKeyInfo};
use serde::Serialize;

/// Everything known about a single table.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize)]
pub struct TableInfo {
    pub columns: ColumnMap,
    /// `None` when the table has no primary key.
    #[serde(rename = "primaryKey", skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKeyInfo>,
    /// `None` when the table has no foreign keys, never an empty list.
    #[serde(rename = "foreignKeys", skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ForeignKeyInfo>>,
}
