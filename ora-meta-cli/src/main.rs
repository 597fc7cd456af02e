use crate::cli::{Commands, OutputFormat, TableFilter};
use clap::Parser;
use ora_meta::{
    query_columns, query_foreign_keys, query_primary_keys, query_schemas, query_tables,
    quote_literal, CatalogQuery, CatalogValue, SqlStatement, TableScoped,
};
use std::io::Write;
use tracing::{debug, instrument};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> std::io::Result<()> {
    // stdout carries the statement, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())?;

    Ok(())
}

#[instrument(skip_all)]
fn run(cli: cli::Cli, out: &mut impl Write) -> std::io::Result<()> {
    let statement = match cli.command {
        Commands::Schemas => query_schemas().statement(),
        Commands::Tables(filter) => match filter.schema {
            Some(schema) => query_tables().filter_schema(&schema).statement(),
            None => query_tables().statement(),
        },
        Commands::Columns(filter) => filtered_statement(query_columns(), &filter),
        Commands::PrimaryKeys(filter) => filtered_statement(query_primary_keys(), &filter),
        Commands::ForeignKeys(filter) => filtered_statement(query_foreign_keys(), &filter),
    };

    debug!(binds = statement.binds.len(), "Rendered catalog query");

    match cli.format {
        OutputFormat::Sql => write_sql(&statement, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &statement)?;
            writeln!(out)
        }
    }
}

fn filtered_statement<T: TableScoped>(query: CatalogQuery<T>, filter: &TableFilter) -> SqlStatement {
    match (&filter.schema, &filter.table) {
        (Some(schema), Some(table)) => query.filter_table(schema, table).statement(),
        (Some(schema), None) => query.filter_schema(schema).statement(),
        _ => query.statement(),
    }
}

fn write_sql(statement: &SqlStatement, out: &mut impl Write) -> std::io::Result<()> {
    for (index, bind) in statement.binds.iter().enumerate() {
        writeln!(out, "-- :{} = {}", index + 1, render_value(bind))?;
    }

    writeln!(out, "{};", statement.sql)
}

fn render_value(value: &CatalogValue) -> String {
    match value {
        CatalogValue::Null => "null".to_string(),
        CatalogValue::Integer(i) => i.to_string(),
        CatalogValue::Float(f) => f.to_string(),
        CatalogValue::Text(s) => quote_literal(s),
    }
}
