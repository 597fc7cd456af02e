use serde::Serialize;

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize)]
pub struct PrimaryKeyInfo {
    pub constraint_name: String,
    pub enabled: bool,
    /// The key columns, comma separated.
    ///
    /// Oracle aggregates these without an ordering key, so the order of a
    /// multi-column key is whatever the database produced.
    pub columns: String,
}

impl PrimaryKeyInfo {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        split_column_list(&self.columns)
    }
}

pub(crate) fn split_column_list(columns: &str) -> impl Iterator<Item = &str> {
    columns.split(',').filter(|c| !c.is_empty())
}
