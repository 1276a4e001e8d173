//! One-shot schema synchronization tool.
//!
//! Renames any existing entity tables to `{table}_bak_{timestamp}` and
//! lets the schema registry create fresh ones, so a botched sync never
//! destroys data. Run it manually after changing an entity definition.

use std::io::Write;

use sea_orm::{ConnectionTrait, Database, Statement};
use tracing::{Level, info};

use yjsite::config::AppConfig;
use yjsite::database::init_db;

const ENTITY_TABLES: &[&str] = &[
    "users",
    "blog",
    "blog_tag",
    "life_share",
    "plan",
    "default_image",
];

fn confirm() -> anyhow::Result<bool> {
    println!("This will rename every existing entity table to a *_bak_<timestamp>");
    println!("backup and create fresh tables from the current entity definitions.");
    print!("Type 'yes' to continue: ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}

/// Create the target database when it does not exist yet. Needs the
/// maintenance connection from `database.admin_url`; skipped when that is
/// not configured.
async fn ensure_database(config: &AppConfig) -> anyhow::Result<()> {
    let Some(ref admin_url) = config.database.admin_url else {
        info!("No admin_url configured; assuming the database exists");
        return Ok(());
    };

    let db_name = config
        .database
        .url
        .rsplit('/')
        .next()
        .and_then(|tail| tail.split('?').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("cannot extract database name from database.url"))?;

    let admin = Database::connect(admin_url.as_str()).await?;
    let create = format!("CREATE DATABASE \"{db_name}\"");
    match admin
        .execute_raw(Statement::from_string(admin.get_database_backend(), create))
        .await
    {
        Ok(_) => info!("Created database {db_name}"),
        Err(e) if e.to_string().contains("already exists") => {
            info!("Database {db_name} already exists");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn backup_tables(config: &AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(config.database.url.as_str()).await?;
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");

    for table in ENTITY_TABLES {
        let rename =
            format!("ALTER TABLE IF EXISTS \"{table}\" RENAME TO \"{table}_bak_{timestamp}\"");
        db.execute_raw(Statement::from_string(db.get_database_backend(), rename))
            .await?;
        info!("Backed up {table} -> {table}_bak_{timestamp}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    if !confirm()? {
        println!("Aborted; nothing was written.");
        return Ok(());
    }

    ensure_database(&config).await?;
    backup_tables(&config).await?;

    // Connecting runs the registry sync, which recreates the tables.
    init_db(&config.database.url).await?;
    info!("Schema synchronized");

    Ok(())
}
