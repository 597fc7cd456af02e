use crate::catalog_connection::{CatalogRow, FromRow};
use crate::catalog_reader::{define_table_query, is_flag_set, CatalogQuery};
use crate::query_builder::{Condition, SelectQueryBuilder};
use crate::ForeignKeyInfo;

/// One row per referencing column of a foreign key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ForeignKeyResult {
    pub schema_name: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub foreign_schema: String,
    pub foreign_table_name: String,
    pub foreign_columns: String,
    pub enabled: bool,
}

impl FromRow for ForeignKeyResult {
    fn from_row(row: CatalogRow) -> crate::Result<Self> {
        Ok(ForeignKeyResult {
            schema_name: row.try_get("schema_name")?,
            table_name: row.try_get("table_name")?,
            constraint_name: row.try_get("constraint_name")?,
            column_name: row.try_get("column_name")?,
            foreign_schema: row.try_get("foreign_schema")?,
            foreign_table_name: row.try_get("foreign_table_name")?,
            foreign_columns: row
                .try_get::<Option<String>>("foreign_columns")?
                .unwrap_or_default(),
            enabled: is_flag_set(&row, "enabled", "ENABLED")?,
        })
    }
}

impl ForeignKeyResult {
    pub fn into_foreign_key_info(self) -> ForeignKeyInfo {
        ForeignKeyInfo {
            constraint_name: self.constraint_name,
            column_name: self.column_name,
            foreign_schema: self.foreign_schema,
            foreign_table_name: self.foreign_table_name,
            foreign_columns: self.foreign_columns,
            enabled: self.enabled,
        }
    }
}

pub fn query_foreign_keys() -> CatalogQuery<ForeignKeyResult> {
    let mut builder = SelectQueryBuilder::new();
    builder
        .select([
            "t.owner schema_name",
            "t.table_name",
            "t.constraint_name",
            "acc.column_name",
            "t.r_owner foreign_schema",
            "acr.table_name foreign_table_name",
            "to_char(listagg(acr.column_name, ',') within group (order by null)) foreign_columns",
            "t.status enabled",
        ])
        .from("all_constraints t")
        .join(
            "all_cons_columns acc",
            [
                Condition::columns("acc.owner", "t.owner"),
                Condition::columns("acc.constraint_name", "t.constraint_name"),
            ],
        )
        // The referenced side, found through the unique key the foreign key points at
        .join(
            "all_cons_columns acr",
            [
                Condition::columns("acr.owner", "t.r_owner"),
                Condition::columns("acr.constraint_name", "t.r_constraint_name"),
            ],
        )
        .and_where(Condition::literal("t.constraint_type", "R"))
        .group_by([
            "t.owner",
            "t.table_name",
            "t.constraint_name",
            "acc.column_name",
            "t.r_owner",
            "acr.table_name",
            "t.status",
        ]);

    CatalogQuery::new(builder)
}

define_table_query!(get_foreign_keys, query_foreign_keys, ForeignKeyResult);
