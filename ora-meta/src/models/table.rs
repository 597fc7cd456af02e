use serde::Serialize;

#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize)]
pub struct TableRef {
    pub schema_name: String,
    pub table_name: String,
    /// Row count as of the last statistics gathering, if statistics exist.
    pub num_rows: Option<i64>,
    /// If this is a global temporary table.
    pub temporary: bool,
    pub table_comments: Option<String>,
}
