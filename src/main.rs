use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use user_records::http::{self, TokenVerifier};
use user_records::{
    logging, Config, JsonFileStore, StoreKind, SystemClock, UserService, UserStore,
};

fn open_store(config: &Config) -> anyhow::Result<Box<dyn UserStore>> {
    match config.store_kind {
        StoreKind::File => {
            let mut store = JsonFileStore::new(&config.users_file);
            if let Some(backup) = &config.users_backup_file {
                store = store.with_backup(backup);
            }
            info!(path = %config.users_file.display(), "using json file store");
            Ok(Box::new(store))
        }
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => {
            let store = user_records::SqliteStore::open(&config.users_db)
                .context("Failed to open sqlite store")?;
            info!(path = %config.users_db.display(), "using sqlite store");
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => anyhow::bail!("STORE_KIND=sqlite requires the `sqlite` feature"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init(config.log_format);

    let verifier = TokenVerifier::from_hex_digests(&config.token_digests)
        .context("Failed to parse API_TOKEN_SHA256")?;
    if verifier.is_empty() {
        warn!("API_TOKEN_SHA256 is empty; every /users request will be rejected");
    }

    let store = open_store(&config)?;
    // Surface an unreadable store at startup instead of on the first request.
    let existing = store.read().context("Failed to read users store")?;
    info!(count = existing.len(), "users loaded");

    let service = Arc::new(UserService::new(store, SystemClock));
    http::serve(service, verifier, &config.listen_addr, shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
