use crate::catalog_connection::{CatalogRow, FromRow};
use crate::catalog_reader::{is_flag_set, CatalogQuery, TableScoped};
use crate::query_builder::{Condition, SelectQueryBuilder};
use crate::TableRef;

impl FromRow for TableRef {
    fn from_row(row: CatalogRow) -> crate::Result<Self> {
        Ok(TableRef {
            schema_name: row.try_get("schema_name")?,
            table_name: row.try_get("table_name")?,
            num_rows: row.try_get("num_rows")?,
            temporary: is_flag_set(&row, "temporary", "Y")?,
            table_comments: row.try_get("table_comments")?,
        })
    }
}

impl TableScoped for TableRef {}

pub fn query_tables() -> CatalogQuery<TableRef> {
    let mut comments = SelectQueryBuilder::new();
    comments
        .select(["comments"])
        .from("all_tab_comments atc")
        .and_where(Condition::columns("atc.owner", "t.owner"))
        .and_where(Condition::columns("atc.table_name", "t.table_name"));

    let mut builder = SelectQueryBuilder::new();
    builder
        .select([
            "t.owner schema_name",
            "t.table_name",
            "t.num_rows",
            "t.temporary",
        ])
        .select_subquery(comments, "table_comments")
        .from("all_tables t")
        .order_by(["t.owner", "t.table_name"]);

    CatalogQuery::new(builder)
}
