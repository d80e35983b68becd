//! Database configuration and connection management.
//!
//! Resolves the SQLite URL, opens the connection and creates the storage table
//! from the entity definition with `Schema::create_table_from_entity`, so the
//! schema always matches the Rust model.

use crate::entities::StorageEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/facility_portal.sqlite?mode=rwc";

/// Gets the database URL from `DATABASE_URL` or returns the default SQLite path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the configured database and makes sure the storage table exists.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let url = get_database_url();
    let parent = sqlite_file_path(&url)
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir)?;
    }
    let db = Database::connect(&url).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// File path of a `sqlite://` URL, without query parameters. `None` for
/// in-memory or non-SQLite URLs.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty() && path != ":memory:").then(|| Path::new(path))
}

/// Creates the storage table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut storage_table = schema.create_table_from_entity(StorageEntry);
    storage_table.if_not_exists();

    db.execute(builder.build(&storage_table)).await?;
    Ok(())
}
