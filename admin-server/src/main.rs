//! Studio admin API - serves the dashboard's login, user management and calendar.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;

use studio_admin::{app, logging, AppState, Config};
use studio_directory::{EventCalendar, UserDirectory};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("studio-admin {}", VERSION);
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set STUDIO__SESSION__SECRET.",
            e
        )
    })?;

    logging::init_tracing(&config.logging.level);
    tracing::info!("Starting studio admin API");

    // Backend is chosen once here and never re-checked
    let directory = Arc::new(UserDirectory::from_config(&config.directory)?);
    tracing::info!("User directory backend: {}", directory.backend_kind());

    if let Some(ref bootstrap) = config.bootstrap_admin {
        directory.ensure_admin(bootstrap.to_new_user()).await?;
    }

    let calendar = Arc::new(EventCalendar::new());
    let state = Arc::new(AppState::new(config.clone(), directory, calendar));

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
