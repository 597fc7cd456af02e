use crate::catalog_connection::{
    get_results, CatalogConnection, CatalogRow, CatalogValue, FetchOptions, FromRow, SqlStatement,
};
use crate::query_builder::{Condition, SelectQueryBuilder};
use crate::{ColumnMap, OraMetaError, Result, SchemaRef, TableInfo, TableRef};
use futures::try_join;
use std::marker::PhantomData;
use tracing::{debug, instrument};

pub use foreign_key::{query_foreign_keys, ForeignKeyResult};
pub use primary_key::{query_primary_keys, PrimaryKeyResult};
pub use schema::query_schemas;
pub use table::query_tables;
pub use table_column::{query_columns, TableColumnsResult};

mod foreign_key;
mod primary_key;
mod schema;
mod table;
mod table_column;
#[cfg(test)]
mod tests;

/// A catalog query that has not been executed yet, producing rows of type `T`.
#[derive(Debug, Clone)]
pub struct CatalogQuery<T> {
    builder: SelectQueryBuilder,
    row: PhantomData<fn() -> T>,
}

/// Rows of queries that select from the owning table aliased as `t`,
/// so they can be narrowed with `t.owner` and `t.table_name`.
pub trait TableScoped: FromRow {}

impl<T: FromRow> CatalogQuery<T> {
    pub(crate) fn new(builder: SelectQueryBuilder) -> Self {
        Self {
            builder,
            row: PhantomData,
        }
    }

    pub fn and_where(mut self, condition: Condition) -> Self {
        self.builder.and_where(condition);
        self
    }

    pub fn statement(&self) -> SqlStatement {
        self.builder.build()
    }

    pub async fn fetch_all<C: CatalogConnection>(
        &self,
        connection: &C,
        options: &FetchOptions,
    ) -> Result<Vec<T>> {
        get_results(connection, &self.statement(), options).await
    }
}

impl<T: TableScoped> CatalogQuery<T> {
    pub fn filter_schema(self, schema: &str) -> Self {
        self.and_where(Condition::bind("t.owner", schema))
    }

    pub fn filter_table(self, schema: &str, table_name: &str) -> Self {
        self.filter_schema(schema)
            .and_where(Condition::bind("t.table_name", table_name))
    }
}

/// Reads schema metadata from the Oracle data dictionary.
pub struct CatalogReader<'a, C> {
    connection: &'a C,
    options: FetchOptions,
}

impl<'a, C: CatalogConnection> CatalogReader<'a, C> {
    pub fn new(connection: &'a C) -> Self {
        Self::with_options(connection, FetchOptions::default())
    }

    pub fn with_options(connection: &'a C, options: FetchOptions) -> Self {
        CatalogReader {
            connection,
            options,
        }
    }

    #[instrument(skip_all)]
    pub async fn get_schemas(&self) -> Result<Vec<SchemaRef>> {
        query_schemas()
            .fetch_all(self.connection, &self.options)
            .await
    }

    /// Gets all tables visible to the connected user, or only those owned by `schema`.
    #[instrument(skip(self))]
    pub async fn get_tables(&self, schema: Option<&str>) -> Result<Vec<TableRef>> {
        let query = match schema {
            Some(schema) => query_tables().filter_schema(schema),
            None => query_tables(),
        };

        query.fetch_all(self.connection, &self.options).await
    }

    /// Gets the columns, primary key and foreign keys of a single table.
    ///
    /// The three catalog queries run concurrently. If any of them fails that error is
    /// returned and the outcome of the others is discarded.
    #[instrument(skip(self))]
    pub async fn get_table_info(&self, schema: &str, table_name: &str) -> Result<TableInfo> {
        let columns = self.get_columns(schema, table_name);
        let primary_keys = self.get_primary_keys(schema, table_name);
        let foreign_keys = self.get_foreign_keys(schema, table_name);

        let (columns, primary_keys, foreign_keys) =
            try_join!(columns, primary_keys, foreign_keys)?;

        let mut column_map = ColumnMap::new();
        for (column_index, column) in columns.into_iter().enumerate() {
            let (name, column) = column.into_column_info(column_index);
            column_map.insert(name, column);
        }

        let primary_key = primary_keys
            .into_iter()
            .next()
            .map(PrimaryKeyResult::into_primary_key_info);

        let foreign_keys = if foreign_keys.is_empty() {
            None
        } else {
            Some(
                foreign_keys
                    .into_iter()
                    .map(ForeignKeyResult::into_foreign_key_info)
                    .collect(),
            )
        };

        debug!(
            columns = column_map.len(),
            has_primary_key = primary_key.is_some(),
            "Read table info"
        );

        Ok(TableInfo {
            columns: column_map,
            primary_key,
            foreign_keys,
        })
    }
}

/// Checks if a text column holds exactly `expected`. Null and any other value is `false`.
fn is_flag_set(row: &CatalogRow, column: &str, expected: &str) -> Result<bool> {
    match row.get(column) {
        Some(CatalogValue::Text(value)) => Ok(value == expected),
        Some(_) => Ok(false),
        None => Err(OraMetaError::ColumnNotFound {
            column: column.to_string(),
        }),
    }
}

macro_rules! define_table_query {
    ($fn_name:ident, $query_fn:ident, $result:ident) => {
        impl $crate::catalog_reader::TableScoped for $result {}

        impl<C: $crate::catalog_connection::CatalogConnection>
            $crate::catalog_reader::CatalogReader<'_, C>
        {
            #[tracing::instrument(skip(self))]
            pub async fn $fn_name(
                &self,
                schema: &str,
                table_name: &str,
            ) -> $crate::Result<Vec<$result>> {
                $query_fn()
                    .filter_table(schema, table_name)
                    .fetch_all(self.connection, &self.options)
                    .await
            }
        }
    };
}

pub(crate) use define_table_query;
