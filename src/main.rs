use tracing::{error, info};

use memwall::auth::invite;
use memwall::{Config, Database, ImageStore, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("memwall.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load memwall.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = memwall::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        memwall::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    info!("Memwall - class memory wall");

    // Open the database (migrations apply automatically)
    #[cfg(feature = "sqlite")]
    let db = Database::open(&config.database.path, config.database.max_connections).await;
    #[cfg(feature = "postgres")]
    let db = Database::connect(&config.database.url, config.database.max_connections).await;

    let db = match db {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    // A fresh installation gets a first batch of system invite codes
    match invite::ensure_bootstrap_codes(db.pool(), config.invites.codes_per_user).await {
        Ok(codes) if !codes.is_empty() => {
            info!("Generated {} bootstrap invite codes", codes.len());
        }
        Ok(_) => {}
        Err(e) => {
            error!("Failed to bootstrap invite codes: {e}");
            std::process::exit(1);
        }
    }

    let images = match ImageStore::new(&config.uploads) {
        Ok(images) => images,
        Err(e) => {
            error!("Failed to initialize image storage: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db, images) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
