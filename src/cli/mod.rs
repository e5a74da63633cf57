// CLIレイヤー
// ユーザー入力の受付とコマンドルーティング

pub mod commands;

use clap::{Parser, Subcommand};

/// Ferry - Cross-Store Record Reconciliation CLI
///
/// One-shot replication of user-identity records between relational stores.
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(author = "Ferry Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-store record reconciliation CLI tool")]
#[command(long_about = "Ferry - Cross-Store Record Reconciliation CLI

One-shot replication of user-identity records from a source relational
store into a destination relational store.

Ferry:
  • Ensures the destination schema matches before writing
  • Replicates every source record inside one atomic transaction
  • Resolves conflicts by overwriting mutable fields, keyed on id
  • Rolls back completely on the first failure - no partial writes

Supported databases: PostgreSQL, MySQL, SQLite")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Point ferry at your stores:    export SOURCE_DATABASE_URL=... DEST_DATABASE_URL=...
  2. Run the reconciliation:        ferry migrate
  3. Inspect the destination:       ferry serve  (then GET /users)

For detailed help on each command, use: ferry <command> --help")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a one-shot reconciliation from the source store into the destination store
    ///
    /// Connects both stores, ensures the destination schema, fetches every
    /// source record and upserts them into the destination inside a single
    /// transaction. Any failure aborts the whole run with a rollback.
    Migrate {
        /// Source store connection descriptor (falls back to SOURCE_DATABASE_URL)
        #[arg(long, value_name = "URL")]
        source_url: Option<String>,

        /// Destination store connection descriptor (falls back to DEST_DATABASE_URL)
        #[arg(long, value_name = "URL")]
        dest_url: Option<String>,
    },

    /// Serve a read-only JSON listing of the destination store records
    ///
    /// On first boot, creates the records table and seeds the initial
    /// records if the store is empty.
    Serve {
        /// Destination store connection descriptor (falls back to DEST_DATABASE_URL)
        #[arg(long, value_name = "URL")]
        dest_url: Option<String>,

        /// Bind address (falls back to FERRY_HTTP_ADDR, default 0.0.0.0:8080)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
}
