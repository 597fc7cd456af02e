use crate::models::primary_key::split_column_list;
use serde::Serialize;

/// A foreign key, one per referencing column.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize)]
pub struct ForeignKeyInfo {
    pub constraint_name: String,
    /// The referencing column in the table the key belongs to.
    pub column_name: String,
    pub foreign_schema: String,
    pub foreign_table_name: String,
    /// The referenced columns, comma separated in database order.
    pub foreign_columns: String,
    pub enabled: bool,
}

impl ForeignKeyInfo {
    pub fn foreign_column_names(&self) -> impl Iterator<Item = &str> {
        split_column_list(&self.foreign_columns)
    }
}
