use crate::catalog_connection::{CatalogRow, FromRow};
use crate::catalog_reader::CatalogQuery;
use crate::query_builder::SelectQueryBuilder;
use crate::SchemaRef;

impl FromRow for SchemaRef {
    fn from_row(row: CatalogRow) -> crate::Result<Self> {
        Ok(SchemaRef {
            schema_name: row.try_get("schema_name")?,
        })
    }
}

/// Every user of the database, which in Oracle is also every schema.
pub fn query_schemas() -> CatalogQuery<SchemaRef> {
    let mut builder = SelectQueryBuilder::new();
    builder.select(["username schema_name"]).from("dba_users u");

    CatalogQuery::new(builder)
}
