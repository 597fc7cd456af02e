use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Prints the Oracle data dictionary queries ora-meta uses to read schema metadata.
///
/// The printed statements can be run directly in SQL*Plus or SQLcl, which is useful when
/// checking what a user with limited privileges is able to see.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// How to print the query. `json` includes the bind values as a separate list.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Sql, env = "ORA_META_FORMAT")]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// The schemas of the database. Requires access to dba_users.
    Schemas,
    /// Tables with their row count, temporary flag and comment
    Tables(SchemaFilter),
    /// Columns with their normalized data type, nullability and comment
    Columns(TableFilter),
    /// Primary keys with their comma separated columns
    PrimaryKeys(TableFilter),
    /// Foreign keys, one row per referencing column
    ForeignKeys(TableFilter),
}

#[derive(Args, Debug, Clone)]
pub struct SchemaFilter {
    /// Only include tables owned by this schema
    #[arg(long)]
    pub schema: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TableFilter {
    /// Only include tables owned by this schema
    #[arg(long)]
    pub schema: Option<String>,

    /// Only include this table. Oracle stores unquoted names in upper case.
    #[arg(long, requires = "schema")]
    pub table: Option<String>,
}

#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum OutputFormat {
    /// Plain SQL, with the bind values listed in comments above the statement
    Sql,
    /// A JSON object with the SQL and the bind values
    Json,
}


#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}

#[test]
fn table_requires_schema() {
    let result = Cli::try_parse_from(["ora-meta-sql", "columns", "--table", "EMP"]);
    assert!(result.is_err());
}

#[test]
fn parses_table_filter() {
    let cli = Cli::try_parse_from([
        "ora-meta-sql",
        "primary-keys",
        "--schema",
        "HR",
        "--table",
        "EMP",
        "--format",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::PrimaryKeys(filter) => {
            assert_eq!(filter.schema.as_deref(), Some("HR"));
            assert_eq!(filter.table.as_deref(), Some("EMP"));
        }
        other => panic!("Expected primary-keys, got {:?}", other),
    }
}
