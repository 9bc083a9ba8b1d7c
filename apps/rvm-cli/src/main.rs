//! # RVM Ledger CLI
//!
//! Operator tool for the deposit ledger.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  .env / env vars ──► AppConfig ──► Database (migrated) ──► Services    │
//! │                          ▲                                    │         │
//! │                 --db override                                 ▼         │
//! │                                                      JSON on stdout     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures print `error [KIND]: message` on stderr and exit non-zero.

mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rvm_core::{CoreError, ItemId, TransactionId, UserId};
use rvm_db::{migrations, Database, DbConfig};
use rvm_service::{
    PointsService, RegistrationService, ServiceError, StaticIdentityProvider, TransactionService,
};
use serde_json::json;
use tracing::info;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[clap(
    name = "rvm",
    bin_name = "rvm",
    author,
    version,
    about = "Reverse vending machine deposit ledger"
)]
struct Opts {
    /// Database file (overrides DATABASE_FILE_PATH)
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a new transaction
    Start,

    /// Deposit one item into a transaction
    AddItem {
        transaction_id: TransactionId,
        item_id: i64,
    },

    /// Close a transaction and credit its points to a user
    End {
        transaction_id: TransactionId,
        user_id: UserId,
    },

    /// Show a user's point balance
    Points { user_id: UserId },

    /// Show a transaction with its deposits
    Show { transaction_id: TransactionId },

    /// List the item catalog
    Items,

    /// Register the user behind an identity credential
    Register {
        /// JSON identity directory
        #[clap(long)]
        identity_file: PathBuf,

        credential: String,
    },

    /// Check database connectivity and migrations
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e
                .downcast_ref::<ServiceError>()
                .map(|err| err.kind().code())
                .unwrap_or("INTERNAL");
            eprintln!("error [{kind}]: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let opts = Opts::parse();
    let config = AppConfig::load()?;
    logging::init(config.app_env);

    let db_path = opts.db.unwrap_or(config.database_file_path);
    info!(database = %db_path.display(), "Opening database");

    let db = Database::new(DbConfig::new(&db_path).max_connections(config.db_max_connections))
        .await
        .with_context(|| format!("opening {}", db_path.display()))?;
    let db = Arc::new(db);

    let output = match opts.command {
        Command::Start => {
            let id = TransactionService::with_uuid_ids(db.clone())
                .start_transaction()
                .await?;
            json!({ "transaction_id": id })
        }

        Command::AddItem {
            transaction_id,
            item_id,
        } => {
            let count = TransactionService::with_uuid_ids(db.clone())
                .add_item_to_transaction(&transaction_id, ItemId::new(item_id))
                .await?;
            json!({ "transaction_id": transaction_id, "item_count": count })
        }

        Command::End {
            transaction_id,
            user_id,
        } => {
            let points = TransactionService::with_uuid_ids(db.clone())
                .end_transaction_and_assign_user(&transaction_id, &user_id)
                .await?;
            json!({ "transaction_id": transaction_id, "user_id": user_id, "points": points })
        }

        Command::Points { user_id } => {
            let points = PointsService::new(db.clone()).get_points(&user_id).await?;
            json!({ "user_id": user_id, "points": points })
        }

        Command::Show { transaction_id } => {
            let transaction = db
                .transactions()
                .get(&transaction_id)
                .await?
                .ok_or_else(|| ServiceError::Domain {
                    operation: "show",
                    source: CoreError::TransactionNotFound(transaction_id.to_string()),
                })?;
            let items = db.transactions().items(&transaction_id).await?;
            let points = db.transactions().points(&transaction_id).await?;
            json!({
                "transaction": transaction,
                "state": transaction.state().as_str(),
                "items": items,
                "points": points,
            })
        }

        Command::Items => json!(db.items().list().await?),

        Command::Register {
            identity_file,
            credential,
        } => {
            let directory = std::fs::read_to_string(&identity_file)
                .with_context(|| format!("reading {}", identity_file.display()))?;
            let provider = StaticIdentityProvider::from_json_str(&directory)
                .with_context(|| format!("parsing {}", identity_file.display()))?;
            let user = RegistrationService::new(db.clone(), provider)
                .register(&credential)
                .await?;
            json!(user)
        }

        Command::Health => {
            let healthy = db.health_check().await;
            let (known, applied) = migrations::migration_status(db.pool()).await?;
            json!({ "healthy": healthy, "migrations_applied": applied, "migrations_known": known })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    db.close().await;
    Ok(())
}
