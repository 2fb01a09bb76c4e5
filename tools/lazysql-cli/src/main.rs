///
/// lazysql CLI - Run a select through a lazy cursor and print the result
///
/// Opens a SQLite database (from --db or a TOML --config), builds a select
/// from the given tables and columns, and drives one cursor entry point:
/// - rows: every row
/// - first-row: the first row only
/// - values: column 0 of every row
/// - first-value: column 0 of the first row
///

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::Level;

use lazysql::{Cursor, DatabaseConfig, Row, SelectQuery, SqliteDatabase, Value};

#[derive(Parser)]
#[command(name = "lazysql")]
#[command(author, version, about = "Query a SQLite database through a lazy cursor", long_about = None)]
struct Cli {
    /// TOML file describing the database to open
    #[arg(long, conflicts_with = "db")]
    config: Option<PathBuf>,

    /// Path to the SQLite database (`:memory:` allowed)
    #[arg(long)]
    db: Option<String>,

    /// Tag used in errors and logs (defaults to the file stem)
    #[arg(long)]
    tag: Option<String>,

    /// Source table, repeatable
    #[arg(long = "table", required = true)]
    tables: Vec<String>,

    /// Result expression, repeatable (defaults to `*`)
    #[arg(long = "column")]
    columns: Vec<String>,

    /// Select distinct rows
    #[arg(long)]
    distinct: bool,

    /// WHERE expression
    #[arg(long = "where")]
    filter: Option<String>,

    /// ORDER BY expression, repeatable
    #[arg(long)]
    order_by: Vec<String>,

    /// Maximum number of rows
    #[arg(long)]
    limit: Option<u64>,

    #[arg(long, value_enum, default_value = "rows")]
    mode: Mode,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// Log cursor activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Rows,
    FirstRow,
    Values,
    FirstValue,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> lazysql::Result<DatabaseConfig> {
    let mut config = match (&cli.config, &cli.db) {
        (Some(path), _) => DatabaseConfig::from_path(path)?,
        (None, Some(db)) => DatabaseConfig::new(db.clone()),
        (None, None) => DatabaseConfig::in_memory(),
    };
    if cli.tag.is_some() {
        config.tag = cli.tag.clone();
    }
    Ok(config)
}

fn build_query(cli: &Cli) -> SelectQuery {
    let mut query = SelectQuery::new(cli.distinct, cli.columns.clone(), cli.tables.clone())
        .order_by(cli.order_by.iter().cloned());
    if let Some(ref filter) = cli.filter {
        query = query.with_filter(filter.clone());
    }
    if let Some(limit) = cli.limit {
        query = query.limit(limit);
    }
    query
}

fn run(cli: &Cli) -> lazysql::Result<()> {
    let config = load_config(cli)?;
    let db = SqliteDatabase::from_config(&config)?;
    let mut cursor = Cursor::from_query(&db, build_query(cli))?;

    match cli.mode {
        Mode::Rows => {
            let columns = cursor.column_names()?;
            let rows = cursor.all_rows()?;
            print_rows(cli.format, &columns, &rows);
        }
        Mode::FirstRow => {
            let columns = cursor.column_names()?;
            let rows: Vec<Row> = cursor.next_row()?.into_iter().collect();
            print_rows(cli.format, &columns, &rows);
        }
        Mode::Values => {
            let values = cursor.all_values()?;
            print_values(cli.format, &values);
        }
        Mode::FirstValue => {
            let values: Vec<Value> = cursor.next_value()?.into_iter().collect();
            print_values(cli.format, &values);
        }
    }

    cursor.release()
}

fn print_rows(format: Format, columns: &[String], rows: &[Row]) {
    match format {
        Format::Table => {
            println!("{}", columns.join("\t"));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                println!("{}", cells.join("\t"));
            }
        }
        Format::Json => {
            let doc = json!({ "columns": columns, "rows": rows });
            println!("{}", doc);
        }
    }
}

fn print_values(format: Format, values: &[Value]) {
    match format {
        Format::Table => {
            for value in values {
                println!("{}", value);
            }
        }
        Format::Json => {
            println!("{}", json!(values));
        }
    }
}
