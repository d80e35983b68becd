use chrono::Utc;
use dotenvy::dotenv;
use facility_portal::{
    Portal, Result,
    catalogue::default_cycle_templates,
    config::{self, database},
    core::report,
    storage::SqliteStorage,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the portal configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;

    // 4. Open the database backing the blob store
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Rehydrate the portal, seeding whatever has never been stored
    let templates = if app_config.cycles.is_empty() {
        default_cycle_templates()
    } else {
        info!("Using {} cycles from configuration", app_config.cycles.len());
        app_config.cycles.clone()
    };
    let portal = Portal::load_from_templates(SqliteStorage::new(db), &templates)
        .await
        .inspect_err(|e| error!("Failed to load portal state: {}", e))?;
    let now = Utc::now();

    // 6. Report where things stand
    let stats = report::dashboard_stats(portal.tickets(), portal.cycles(), now, &app_config);
    info!(
        "Dashboard:\n{}",
        report::format_dashboard_summary(&stats, now)
    );
    if let Some(user) = portal.current_user() {
        info!(
            "Session restored for {} ({}), {} unread notifications",
            user.name,
            user.role.label(),
            portal.unread_count(&user.id)
        );
    }

    Ok(())
}
