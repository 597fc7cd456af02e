use crate::catalog_connection::{CatalogRow, FromRow};
use crate::catalog_reader::{define_table_query, is_flag_set, CatalogQuery};
use crate::query_builder::{Condition, SelectQueryBuilder};
use crate::PrimaryKeyInfo;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PrimaryKeyResult {
    pub schema_name: String,
    pub table_name: String,
    pub constraint_name: String,
    pub enabled: bool,
    pub columns: String,
}

impl FromRow for PrimaryKeyResult {
    fn from_row(row: CatalogRow) -> crate::Result<Self> {
        Ok(PrimaryKeyResult {
            schema_name: row.try_get("schema_name")?,
            table_name: row.try_get("table_name")?,
            constraint_name: row.try_get("constraint_name")?,
            enabled: is_flag_set(&row, "enabled", "ENABLED")?,
            columns: row
                .try_get::<Option<String>>("columns")?
                .unwrap_or_default(),
        })
    }
}

impl PrimaryKeyResult {
    pub fn into_primary_key_info(self) -> PrimaryKeyInfo {
        PrimaryKeyInfo {
            constraint_name: self.constraint_name,
            enabled: self.enabled,
            columns: self.columns,
        }
    }
}

pub fn query_primary_keys() -> CatalogQuery<PrimaryKeyResult> {
    let mut builder = SelectQueryBuilder::new();
    builder
        .select([
            "t.owner schema_name",
            "t.table_name",
            "t.constraint_name",
            "t.status enabled",
            "to_char(listagg(acc.column_name, ',') within group (order by null)) columns",
        ])
        .from("all_constraints t")
        .join(
            "all_cons_columns acc",
            [
                Condition::columns("acc.owner", "t.owner"),
                Condition::columns("acc.constraint_name", "t.constraint_name"),
            ],
        )
        .and_where(Condition::literal("t.constraint_type", "P"))
        .group_by([
            "t.owner",
            "t.table_name",
            "t.constraint_name",
            "t.status",
        ]);

    CatalogQuery::new(builder)
}

define_table_query!(get_primary_keys, query_primary_keys, PrimaryKeyResult);
