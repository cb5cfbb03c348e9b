// src/main.rs

use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use trivia_store::config::{self, Config};
use trivia_store::error::AppError;
use trivia_store::routes;
use trivia_store::state::AppState;
use trivia_store::store::{PgStore, QuestionStore};
use trivia_store::utils::logging::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if present)
    dotenv().ok();

    // Logging is configured from the file, so config errors go to stderr
    let config_path = config::config_path();
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading config file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config.logging);
    tracing::info!("Config loaded from {}", config_path.display());
    config.log_values();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Could not start the API: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    // Open the database connection and make sure the table exists
    let mut store = PgStore::new(&config.database);
    store.open().await?;
    tracing::info!("Database connected...");

    match store.count().await {
        Ok(count) => tracing::info!("{} questions stored", count),
        Err(e) => tracing::warn!("Could not count stored questions: {}", e),
    }

    let app = routes::create_router(AppState::new(store));

    let address = config.api_config.address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
