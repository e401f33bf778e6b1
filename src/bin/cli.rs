//! jsondb CLI
//!
//! Command-line interface for inspecting and editing a jsondb store.

use clap::{Parser, Subcommand};
use jsondb::{Config, JsonDbError, SetOptions, Store};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// jsondb CLI
#[derive(Parser, Debug)]
#[command(name = "jsondb-cli")]
#[command(about = "CLI for the jsondb document store")]
#[command(version)]
struct Args {
    /// Root directory (the store lives under {root}/.databases)
    #[arg(short, long, default_value = "./.data")]
    root: String,

    /// Store namespace
    #[arg(short, long, default_value = "default")]
    namespace: String,

    /// Encryption password (enables encryption at rest)
    #[arg(short, long, env = "JSONDB_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List tables
    Tables,

    /// List entries of a table
    List {
        /// Table name
        table: String,
    },

    /// Print an entry's document
    Get {
        /// Table name
        table: String,

        /// Entry id
        id: String,
    },

    /// Create an entry from a JSON object
    Create {
        /// Table name
        table: String,

        /// Document (JSON object)
        json: String,
    },

    /// Merge a JSON object into an entry
    Set {
        /// Table name
        table: String,

        /// Entry id
        id: String,

        /// Document (JSON object)
        json: String,

        /// Replace the document instead of merging
        #[arg(long)]
        overwrite: bool,
    },

    /// Delete an entry
    Delete {
        /// Table name
        table: String,

        /// Entry id
        id: String,
    },

    /// Delete a table and all of its entries
    DropTable {
        /// Table name
        table: String,
    },
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,jsondb=debug";

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> jsondb::Result<()> {
    let mut builder = Config::builder()
        .root(&args.root)
        .namespace(&args.namespace);
    if let Some(key) = args.key {
        builder = builder.encrypt(true).key(key);
    }

    let store = Store::open(builder.build())?;

    let output = match args.command {
        Commands::Tables => store
            .transact(|db| db.tables().map(|names| names.join("\n")))
            .wait()?,

        Commands::List { table } => store
            .transact(move |db| {
                let entries = db.table(&table)?.entries()?;
                let mut lines = Vec::with_capacity(entries.count());
                for entry in &entries {
                    lines.push(format!("{}\t{}", entry.id(), Value::Object(entry.data()?)));
                }
                Ok(lines.join("\n"))
            })
            .wait()?,

        Commands::Get { table, id } => store
            .transact(move |db| {
                let data = db.table(&table)?.entry(&id)?.data()?;
                Ok(serde_json::to_string_pretty(&data)?)
            })
            .wait()?,

        Commands::Create { table, json } => {
            let doc = parse_document(&json)?;
            store
                .transact(move |db| {
                    let entry = db.table(&table)?.create_entry()?;
                    entry.set(doc, SetOptions::overwrite())?;
                    Ok(entry.id().to_string())
                })
                .wait()?
        }

        Commands::Set {
            table,
            id,
            json,
            overwrite,
        } => {
            let doc = parse_document(&json)?;
            store
                .transact(move |db| {
                    let entry = db.table(&table)?.entry(&id)?;
                    let data = entry.set(doc, SetOptions { overwrite })?.data()?;
                    Ok(serde_json::to_string_pretty(&data)?)
                })
                .wait()?
        }

        Commands::Delete { table, id } => store
            .transact(move |db| {
                let entry = db.table(&table)?.entry(&id)?.drop().confirm()?;
                Ok(format!("deleted {}", entry.id()))
            })
            .wait()?,

        Commands::DropTable { table } => store
            .transact(move |db| {
                let table = db.table(&table)?.drop().confirm()?;
                Ok(format!("dropped {}", table.name()))
            })
            .wait()?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

fn parse_document(json: &str) -> jsondb::Result<Value> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(JsonDbError::Validation(
            "document must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}
