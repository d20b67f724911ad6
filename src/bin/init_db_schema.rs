use dotenvy::dotenv;
use eyre::Result;
use tracing::{info};

use ipo_admin_console::logging;
use ipo_admin_console::config;
use ipo_admin_console::db::{
    connection,
    schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load()?;
    info!(mode = %cfg.mode, "Configuration loaded and logging initialized");

    // Initialize database connection pool
    let pool = connection::create_pool(&cfg).await?;
    info!("Database connection pool created");

    // Create system_settings and its default row
    schema::init_schema(&pool).await?;
    info!("Database schema initialized");

    tokio::time::sleep(std::time::Duration::from_millis(500)).await; // Allow time for logging to flush
    Ok(())
}
