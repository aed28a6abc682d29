//! RecordKit CLI
//!
//! Runs collection operations against a JSON data file loaded into a
//! memory store.
//!
//! # Commands
//!
//! - `find` / `find-one` / `count` - Read matching records
//! - `create` - Save a new record
//! - `update` / `remove` - Mutate by `--id` or by query
//! - `find-or-create` / `create-or-update` - Upserts
//!
//! Query and data arguments are JSON objects. Results print as pretty JSON
//! on stdout; logs (including one line per hook event) go to stderr.

mod audit;
mod commands;
mod error;
mod session;

use clap::{Parser, Subcommand};
use commands::write::Target;
use commands::{find, parse_fields, parse_value, write};
use recordkit_core::{Fields, Query, DEFAULT_TABLE};
use serde_json::Value;
use session::Session;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Record collection tools over a JSON data file.
#[derive(Parser)]
#[command(name = "recordkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON data file
    #[arg(
        id = "data_file",
        global = true,
        short = 'd',
        long = "data",
        value_name = "DATA",
        default_value = "records.json"
    )]
    data: PathBuf,

    /// Table to operate on
    #[arg(global = true, short, long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Write changes back to the data file
    #[arg(global = true, short, long)]
    write: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching a query
    Find {
        /// Query object (default: match all)
        #[arg(value_parser = parse_fields)]
        query: Option<Fields>,
    },

    /// Show the first record matching a query
    FindOne {
        /// Query object (default: match all)
        #[arg(value_parser = parse_fields)]
        query: Option<Fields>,
    },

    /// Count records matching a query
    Count {
        /// Query object (default: match all)
        #[arg(value_parser = parse_fields)]
        query: Option<Fields>,
    },

    /// Create a record
    Create {
        /// Field object
        #[arg(value_parser = parse_fields)]
        data: Fields,
    },

    /// Update records by id or query
    Update {
        /// Patch object
        #[arg(value_parser = parse_fields)]
        data: Fields,

        /// Update exactly this id
        #[arg(long, value_parser = parse_value, conflicts_with = "query")]
        id: Option<Value>,

        /// Update every record matching this query object
        #[arg(short, long, value_parser = parse_fields)]
        query: Option<Fields>,
    },

    /// Remove records by id or query
    Remove {
        /// Remove exactly this id
        #[arg(long, value_parser = parse_value, conflicts_with = "query")]
        id: Option<Value>,

        /// Remove every record matching this query object
        #[arg(short, long, value_parser = parse_fields)]
        query: Option<Fields>,
    },

    /// Find a record, creating it if absent (query fields win)
    FindOrCreate {
        /// Query object
        #[arg(value_parser = parse_fields)]
        query: Fields,

        /// Extra fields for a created record
        #[arg(value_parser = parse_fields)]
        data: Option<Fields>,
    },

    /// Update a record, creating it if absent (data fields win)
    CreateOrUpdate {
        /// Query object
        #[arg(value_parser = parse_fields)]
        query: Fields,

        /// Data object
        #[arg(value_parser = parse_fields)]
        data: Fields,
    },
}

fn query(fields: Option<Fields>) -> Query {
    fields.map(Query::from).unwrap_or_default()
}

fn target(id: Option<Value>, fields: Option<Fields>) -> Target {
    match id {
        Some(id) => Target::Id(id),
        None => Target::Query(query(fields)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = Session::open(&cli.data)?;
    let collection = session.collection(&cli.table);

    let output = match cli.command {
        Commands::Find { query: q } => find::find(&collection, query(q)).await?,
        Commands::FindOne { query: q } => find::find_one(&collection, query(q)).await?,
        Commands::Count { query: q } => {
            serde_json::to_value(find::count(&collection, query(q)).await?)?
        }
        Commands::Create { data } => write::create(&collection, data).await?,
        Commands::Update { data, id, query } => {
            write::update(&collection, target(id, query), data).await?
        }
        Commands::Remove { id, query } => write::remove(&collection, target(id, query)).await?,
        Commands::FindOrCreate { query: q, data } => {
            write::find_or_create(&collection, Query::from(q), data.unwrap_or_default()).await?
        }
        Commands::CreateOrUpdate { query: q, data } => {
            write::create_or_update(&collection, Query::from(q), data).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if cli.write {
        session.write()?;
    }

    Ok(())
}
