//! Database status check
//!
//! Connects with the server's configuration and compares the migrations
//! embedded in the binary with those recorded in `_sqlx_migrations`.
//! Nothing is written.

use std::collections::HashMap;

use rollbook::backend::server::config::{self, MIGRATOR};
use rollbook::shared::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let app_config = AppConfig::from_env()?;

    println!("DATABASE STATUS");
    println!("===============");
    println!("DATABASE_URL: {}", app_config.database_url);

    let pool = match config::connect(&app_config).await {
        Ok(pool) => {
            println!("Connection: ok");
            pool
        }
        Err(e) => {
            println!("Connection: failed ({e})");
            return Err(e.into());
        }
    };

    let applied: Vec<(i64, String, bool)> = match sqlx::query_as(
        "SELECT version, description, success FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(&pool)
    .await
    {
        Ok(rows) => rows,
        Err(e) => {
            println!("No migration table found ({e}); run the server to apply migrations");
            Vec::new()
        }
    };
    let applied: HashMap<i64, bool> = applied
        .into_iter()
        .map(|(version, _, success)| (version, success))
        .collect();

    println!("\nMigrations:");
    let mut pending = 0;
    for migration in MIGRATOR.iter() {
        let state = match applied.get(&migration.version) {
            Some(true) => "applied",
            Some(false) => "FAILED",
            None => {
                pending += 1;
                "pending"
            }
        };
        println!("  {:>14}  {:<8}  {}", migration.version, state, migration.description);
    }

    println!("\nTables:");
    for table in ["subjects", "teachers", "classes", "students", "attendance"] {
        match sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
        {
            Ok((rows,)) => println!("  {table:<12} {rows} rows"),
            Err(_) => println!("  {table:<12} missing"),
        }
    }

    if pending > 0 {
        println!("\n{pending} migration(s) pending");
    }

    pool.close().await;
    Ok(())
}
