use crate::catalog_connection::{CatalogRow, FromRow};
use crate::catalog_reader::{define_table_query, CatalogQuery};
use crate::query_builder::{Condition, SelectQueryBuilder};
use crate::{ColumnInfo, DataTypeMean};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableColumnsResult {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub data_type_mean: DataTypeMean,
    pub data_length: Option<i64>,
    pub data_precision: Option<i64>,
    pub data_scale: Option<i64>,
    pub char_length: Option<i64>,
    pub default_value: Option<String>,
    pub is_notnull: bool,
    pub column_comments: Option<String>,
}

impl FromRow for TableColumnsResult {
    fn from_row(row: CatalogRow) -> crate::Result<Self> {
        let data_type: String = row.try_get("data_type")?;
        let data_type_mean = match DataTypeMean::classify(&data_type) {
            Some(mean) => mean,
            None => DataTypeMean::Other(row.try_get("data_type_mean")?),
        };

        Ok(TableColumnsResult {
            schema_name: row.try_get("schema_name")?,
            table_name: row.try_get("table_name")?,
            column_name: row.try_get("column_name")?,
            data_type,
            data_type_mean,
            data_length: row.try_get("data_length")?,
            data_precision: row.try_get("data_precision")?,
            data_scale: row.try_get("data_scale")?,
            char_length: row.try_get("char_length")?,
            default_value: row.try_get("default_value")?,
            is_notnull: row.try_get("is_notnull")?,
            column_comments: row.try_get("column_comments")?,
        })
    }
}

impl TableColumnsResult {
    /// Splits the row into the column name and its info, at position `column_index`.
    pub fn into_column_info(self, column_index: usize) -> (String, ColumnInfo) {
        (
            self.column_name,
            ColumnInfo {
                column_index,
                data_type: self.data_type,
                data_type_mean: self.data_type_mean,
                data_length: self.data_length,
                data_precision: self.data_precision,
                data_scale: self.data_scale,
                char_length: self.char_length,
                default_value: self.default_value,
                is_notnull: self.is_notnull,
                column_comments: self.column_comments,
            },
        )
    }
}

pub fn query_columns() -> CatalogQuery<TableColumnsResult> {
    let mut comments = SelectQueryBuilder::new();
    comments
        .select(["comments"])
        .from("all_col_comments acc")
        .and_where(Condition::columns("acc.owner", "t.owner"))
        .and_where(Condition::columns("acc.table_name", "t.table_name"))
        .and_where(Condition::columns("acc.column_name", "c.column_name"));

    let mut builder = SelectQueryBuilder::new();
    builder
        .select([
            "t.owner schema_name",
            "t.table_name",
            "c.column_name",
            "c.data_type",
        ])
        .select_as("c.data_type", "data_type_mean")
        .select([
            "c.data_length",
            "c.data_precision",
            "c.data_scale",
            "c.char_length",
        ])
        .select_as("c.data_default", "default_value")
        .select_case(Condition::literal("c.nullable", "Y"), "0", "1", "is_notnull")
        .select_subquery(comments, "column_comments")
        .from("all_tables t")
        .join(
            "all_tab_columns c",
            [
                Condition::columns("c.owner", "t.owner"),
                Condition::columns("c.table_name", "t.table_name"),
            ],
        )
        .order_by(["t.owner", "t.table_name", "c.column_id"]);

    CatalogQuery::new(builder)
}

define_table_query!(get_columns, query_columns, TableColumnsResult);
