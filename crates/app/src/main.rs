use std::{sync::Arc, time::Duration};

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finledger={level},server={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let db = match parse_database(&settings.server.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Ok(());
        }
    };

    let timeout = Duration::from_secs(settings.tools.timeout_secs);
    let state = server::ServerState::new(
        ledger::Ledger::new(db),
        Arc::new(ledger::TesseractOcr::new(&settings.tools.tesseract, timeout)),
        Arc::new(ledger::WkhtmltopdfRenderer::new(
            &settings.tools.wkhtmltopdf,
            timeout,
        )),
    );

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Ok(());
        }
    };

    if let Err(err) = server::run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
