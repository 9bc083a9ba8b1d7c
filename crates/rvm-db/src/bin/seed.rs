//! # Catalog Seeder
//!
//! Populates the item catalog a machine accepts, plus optional demo users.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog into ./data.db
//! cargo run -p rvm-db --bin seed
//!
//! # Specify database path
//! cargo run -p rvm-db --bin seed -- --db ./data/rvm.db
//!
//! # Also create demo users for manual testing
//! cargo run -p rvm-db --bin seed -- --with-demo-users
//! ```
//!
//! Safe to re-run: items are upserted by code, users that already exist are
//! left alone.

use std::env;

use rvm_core::validation::{validate_item_name, validate_points};
use rvm_core::{Item, ItemId, NewUser, UserId};
use rvm_db::{Database, DbConfig};
use tracing::{info, warn};

/// Recyclables accepted by the machine: (item code, name, points per deposit).
///
/// Code 1 is what the camera classifier reports for a plastic bottle.
const CATALOG: &[(i64, &str, i64)] = &[
    (1, "Plastic bottle", 10),
    (2, "Aluminium can", 15),
    (3, "Glass bottle", 20),
    (4, "Beverage carton", 5),
    (5, "Steel can", 12),
];

/// (user id, full name, email)
const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("demo-user-0001", "Demo User", "demo@example.com"),
    ("demo-user-0002", "Second Demo", "demo2@example.com"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("DATABASE_FILE_PATH").unwrap_or_else(|_| "./data.db".to_string());
    let mut with_demo_users = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-demo-users" => with_demo_users = true,
            "--help" | "-h" => {
                println!("RVM Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: $DATABASE_FILE_PATH or ./data.db)");
                println!("      --with-demo-users  Also create demo users");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(database = %db_path, "Seeding catalog");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    for (code, name, points) in CATALOG {
        validate_item_name(name)?;
        validate_points(*points)?;

        let item = Item {
            item_id: ItemId::new(*code),
            name: (*name).to_string(),
            points: *points,
        };
        db.items().upsert(&item).await?;
    }
    info!(items = db.items().count().await?, "Catalog ready");

    if with_demo_users {
        let mut created = 0;
        for (user_id, full_name, email) in DEMO_USERS {
            let user_id = UserId::parse(*user_id)?;
            if db.users().exists(&user_id).await? {
                continue;
            }
            db.users()
                .create(&NewUser {
                    user_id,
                    full_name: (*full_name).to_string(),
                    email: (*email).to_string(),
                })
                .await?;
            created += 1;
        }
        info!(created, "Demo users ready");
    }

    db.close().await;

    println!("✓ Seed complete!");

    Ok(())
}
