
use super::*;
use crate::test_helpers::{
    column_row, foreign_key_row, init_tracing, primary_key_row, FakeCatalog, FakeDriverError,
    QueryKind,
};
use crate::{default, ColumnInfo, DataTypeMean, FieldNaming, ForeignKeyInfo, PrimaryKeyInfo};
use std::time::Duration;

fn emp_columns() -> Vec<CatalogRow> {
    vec![
        column_row("HR", "EMP", "ID", "NUMBER", 22, None, Some(0), 1),
        column_row("HR", "EMP", "NAME", "VARCHAR2", 100, None, None, 0),
    ]
}

fn emp_catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_rows(QueryKind::Columns, emp_columns())
        .with_rows(
            QueryKind::PrimaryKeys,
            vec![primary_key_row("HR", "EMP", "EMP_PK", "ENABLED", "ID")],
        )
        .with_rows(
            QueryKind::ForeignKeys,
            vec![foreign_key_row(
                "HR",
                "EMP",
                "EMP_DEPT_FK",
                "DEPT_ID",
                "HR",
                "DEPT",
                "ID",
                "ENABLED",
            )],
        )
}

fn expected_column(column_index: usize, data_type: &str, data_length: i64, is_notnull: bool) -> ColumnInfo {
    ColumnInfo {
        column_index,
        data_type: data_type.to_string(),
        data_type_mean: DataTypeMean::from_data_type(data_type),
        data_length: Some(data_length),
        data_precision: None,
        data_scale: None,
        char_length: Some(0),
        default_value: None,
        is_notnull,
        column_comments: None,
    }
}

#[tokio::test]
async fn reads_table_info() {
    init_tracing();
    let catalog = emp_catalog();
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("HR", "EMP").await.unwrap();

    let mut columns = ColumnMap::new();
    columns.insert(
        "ID".to_string(),
        ColumnInfo {
            data_scale: Some(0),
            ..expected_column(0, "NUMBER", 22, true)
        },
    );
    columns.insert("NAME".to_string(), expected_column(1, "VARCHAR2", 100, false));

    similar_asserts::assert_eq!(
        info,
        TableInfo {
            columns,
            primary_key: Some(PrimaryKeyInfo {
                constraint_name: "EMP_PK".to_string(),
                enabled: true,
                columns: "ID".to_string(),
            }),
            foreign_keys: Some(vec![ForeignKeyInfo {
                constraint_name: "EMP_DEPT_FK".to_string(),
                column_name: "DEPT_ID".to_string(),
                foreign_schema: "HR".to_string(),
                foreign_table_name: "DEPT".to_string(),
                foreign_columns: "ID".to_string(),
                enabled: true,
            }]),
        }
    );

    assert_eq!(info.columns.get("ID").unwrap().data_type_mean.as_str(), "NUMBER");
    assert_eq!(info.columns.get("NAME").unwrap().data_type_mean, DataTypeMean::Varchar);
}

#[tokio::test]
async fn table_info_serializes_without_key_fields() {
    let catalog = emp_catalog();
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("HR", "EMP").await.unwrap();
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["columns"]["ID"]["column_index"], 0);
    assert_eq!(json["columns"]["ID"]["is_notnull"], 1);
    assert_eq!(json["columns"]["NAME"]["is_notnull"], 0);
    assert_eq!(json["columns"]["NAME"]["data_type_mean"], "VARCHAR");
    assert_eq!(json["primaryKey"]["constraint_name"], "EMP_PK");
    assert_eq!(json["foreignKeys"][0]["foreign_table_name"], "DEPT");

    for key in ["schema_name", "table_name", "column_name"] {
        assert!(json["columns"]["ID"].get(key).is_none(), "{key}");
        assert!(json["primaryKey"].get(key).is_none(), "{key}");
    }
    assert!(json["foreignKeys"][0].get("schema_name").is_none());
    assert!(json["foreignKeys"][0].get("table_name").is_none());
}

#[tokio::test]
async fn filters_every_query_on_the_requested_table() {
    let catalog = emp_catalog();
    let reader = CatalogReader::new(&catalog);

    reader.get_table_info("HR", "EMP").await.unwrap();

    let executed = catalog.executed();
    assert_eq!(executed.len(), 3);
    for statement in executed {
        assert!(
            statement.sql.contains("t.owner = :1 and t.table_name = :2"),
            "{}",
            statement.sql
        );
        assert_eq!(
            statement.binds,
            vec![CatalogValue::from("HR"), CatalogValue::from("EMP")]
        );
    }
}

#[tokio::test]
async fn starts_all_queries_before_waiting_for_any() {
    // None of the queries can finish before all three have started,
    // so running them one after the other would never complete
    let catalog = emp_catalog().with_rendezvous(3);
    let reader = CatalogReader::new(&catalog);

    let info = tokio::time::timeout(Duration::from_secs(5), reader.get_table_info("HR", "EMP"))
        .await
        .expect("Queries were not started concurrently")
        .unwrap();

    assert_eq!(info.columns.len(), 2);
    assert_eq!(
        catalog.executed_kinds(),
        vec![
            QueryKind::Columns,
            QueryKind::PrimaryKeys,
            QueryKind::ForeignKeys
        ]
    );
}

#[tokio::test]
async fn primary_key_failure_fails_the_table_info() {
    let catalog = FakeCatalog::new()
        .with_rows(QueryKind::Columns, emp_columns())
        .with_failure(
            QueryKind::PrimaryKeys,
            "ORA-03113: end-of-file on communication channel",
        );
    let reader = CatalogReader::new(&catalog);

    let result = reader.get_table_info("HR", "EMP").await;

    match result {
        Err(OraMetaError::QueryFailed { query, source }) => {
            assert!(query.contains("t.constraint_type = 'P'"), "{query}");
            assert_eq!(
                source.downcast_ref::<FakeDriverError>(),
                Some(&FakeDriverError(
                    "ORA-03113: end-of-file on communication channel".to_string()
                ))
            );
        }
        other => panic!("Expected QueryFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn first_failure_does_not_wait_for_other_queries() {
    let catalog = FakeCatalog::new()
        .with_pending(QueryKind::Columns)
        .with_pending(QueryKind::ForeignKeys)
        .with_failure(QueryKind::PrimaryKeys, "ORA-12541: TNS:no listener");
    let reader = CatalogReader::new(&catalog);

    let result = tokio::time::timeout(Duration::from_secs(5), reader.get_table_info("HR", "EMP"))
        .await
        .expect("Waited for the pending queries");

    let error = result.unwrap_err();
    assert!(error.to_string().contains("ORA-12541"), "{error}");
}

#[tokio::test]
async fn table_without_keys_has_no_key_info() {
    let catalog = FakeCatalog::new().with_rows(QueryKind::Columns, emp_columns());
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("HR", "EMP").await.unwrap();

    assert_eq!(info.columns.len(), 2);
    assert_eq!(info.primary_key, None);
    assert_eq!(info.foreign_keys, None);

    let json = serde_json::to_value(&info).unwrap();
    assert!(json.get("primaryKey").is_none());
    assert!(json.get("foreignKeys").is_none());
}

#[tokio::test]
async fn first_primary_key_row_wins() {
    let catalog = FakeCatalog::new().with_rows(
        QueryKind::PrimaryKeys,
        vec![
            primary_key_row("HR", "EMP", "EMP_PK", "ENABLED", "ID"),
            primary_key_row("HR", "EMP", "EMP_PK_OLD", "DISABLED", "NAME"),
        ],
    );
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("HR", "EMP").await.unwrap();

    assert_eq!(info.primary_key.unwrap().constraint_name, "EMP_PK");
    assert!(info.columns.is_empty());
}

#[tokio::test]
async fn multi_column_foreign_keys_keep_query_order() {
    let catalog = FakeCatalog::new().with_rows(
        QueryKind::ForeignKeys,
        vec![
            foreign_key_row(
                "SALES", "ORDER_LINES", "LINES_ORDER_FK", "ORDER_ID", "SALES", "ORDERS",
                "ID,REGION", "ENABLED",
            ),
            foreign_key_row(
                "SALES", "ORDER_LINES", "LINES_ORDER_FK", "REGION", "SALES", "ORDERS",
                "ID,REGION", "ENABLED",
            ),
            foreign_key_row(
                "SALES", "ORDER_LINES", "LINES_PRODUCT_FK", "PRODUCT_ID", "CATALOG",
                "PRODUCTS", "ID", "DISABLED",
            ),
        ],
    );
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("SALES", "ORDER_LINES").await.unwrap();
    let foreign_keys = info.foreign_keys.unwrap();

    assert_eq!(
        foreign_keys
            .iter()
            .map(|f| f.column_name.as_str())
            .collect::<Vec<_>>(),
        vec!["ORDER_ID", "REGION", "PRODUCT_ID"]
    );
    assert_eq!(
        foreign_keys[0].foreign_column_names().collect::<Vec<_>>(),
        vec!["ID", "REGION"]
    );
    assert_eq!(foreign_keys[2].foreign_schema, "CATALOG");
    assert!(!foreign_keys[2].enabled);
}

#[tokio::test]
async fn column_index_follows_fetch_order() {
    let names = ["ID", "CODE", "NAME", "CREATED_AT", "NOTES"];
    let rows = names
        .iter()
        .map(|name| column_row("HR", "JOBS", name, "VARCHAR2", 10, None, None, 0))
        .collect();
    let catalog = FakeCatalog::new().with_rows(QueryKind::Columns, rows);
    let reader = CatalogReader::new(&catalog);

    let info = reader.get_table_info("HR", "JOBS").await.unwrap();

    assert_eq!(info.columns.names().collect::<Vec<_>>(), names.to_vec());
    assert_eq!(
        info.columns
            .iter()
            .map(|(_, c)| c.column_index)
            .collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
}

#[tokio::test]
async fn fetches_with_default_options() {
    let catalog = emp_catalog();
    let reader = CatalogReader::new(&catalog);

    reader.get_table_info("HR", "EMP").await.unwrap();

    let options = catalog.fetch_options();
    assert_eq!(options.len(), 3);
    for fetch in options {
        assert_eq!(fetch.max_rows, 100_000);
        assert_eq!(fetch.naming, FieldNaming::Lowercase);
    }
}

#[tokio::test]
async fn respects_max_rows() {
    let rows = ["A", "B", "C"]
        .iter()
        .map(|name| column_row("HR", "T", name, "NUMBER", 22, None, None, 1))
        .collect();
    let catalog = FakeCatalog::new().with_rows(QueryKind::Columns, rows);
    let reader = CatalogReader::with_options(
        &catalog,
        FetchOptions {
            max_rows: 2,
            ..default()
        },
    );

    let info = reader.get_table_info("HR", "T").await.unwrap();

    assert_eq!(info.columns.names().collect::<Vec<_>>(), vec!["A", "B"]);
}

#[tokio::test]
async fn preserved_upper_case_names_are_not_found() {
    let catalog = FakeCatalog::new().with_rows(QueryKind::Columns, emp_columns());
    let reader = CatalogReader::with_options(
        &catalog,
        FetchOptions {
            naming: FieldNaming::Preserve,
            ..default()
        },
    );

    match reader.get_table_info("HR", "EMP").await {
        Err(OraMetaError::ColumnNotFound { column }) => assert_eq!(column, "data_type"),
        other => panic!("Expected ColumnNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn reads_schemas() {
    let catalog = FakeCatalog::new().with_rows(
        QueryKind::Schemas,
        vec![
            CatalogRow::new().with("SCHEMA_NAME", "HR"),
            CatalogRow::new().with("SCHEMA_NAME", "SALES"),
        ],
    );
    let reader = CatalogReader::new(&catalog);

    let schemas = reader.get_schemas().await.unwrap();

    assert_eq!(
        schemas,
        vec![
            SchemaRef {
                schema_name: "HR".to_string()
            },
            SchemaRef {
                schema_name: "SALES".to_string()
            },
        ]
    );
    assert!(catalog.executed()[0].binds.is_empty());
}

#[tokio::test]
async fn reads_tables_of_a_schema() {
    let catalog = FakeCatalog::new().with_rows(
        QueryKind::Tables,
        vec![
            CatalogRow::new()
                .with("SCHEMA_NAME", "HR")
                .with("TABLE_NAME", "EMP")
                .with("NUM_ROWS", 107)
                .with("TEMPORARY", "N")
                .with("TABLE_COMMENTS", "Employees"),
            CatalogRow::new()
                .with("SCHEMA_NAME", "HR")
                .with("TABLE_NAME", "EMP_STAGE")
                .with("NUM_ROWS", None::<i64>)
                .with("TEMPORARY", "Y")
                .with("TABLE_COMMENTS", None::<String>),
        ],
    );
    let reader = CatalogReader::new(&catalog);

    let tables = reader.get_tables(Some("HR")).await.unwrap();

    assert_eq!(
        tables,
        vec![
            TableRef {
                schema_name: "HR".to_string(),
                table_name: "EMP".to_string(),
                num_rows: Some(107),
                temporary: false,
                table_comments: Some("Employees".to_string()),
            },
            TableRef {
                schema_name: "HR".to_string(),
                table_name: "EMP_STAGE".to_string(),
                temporary: true,
                ..default()
            },
        ]
    );

    let executed = catalog.executed();
    assert!(executed[0].sql.contains("where t.owner = :1\norder by"));
    assert_eq!(executed[0].binds, vec![CatalogValue::from("HR")]);
}

#[tokio::test]
async fn reads_all_tables_without_filter() {
    let catalog = FakeCatalog::new();
    let reader = CatalogReader::new(&catalog);

    let tables = reader.get_tables(None).await.unwrap();

    assert!(tables.is_empty());
    assert!(!catalog.executed()[0].sql.contains("where t.owner"));
}
