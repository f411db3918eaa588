use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use voxpulse::bootstrap::{Backends, assemble};
use voxpulse::infrastructure::audio::TranscriptionEngineFactory;
use voxpulse::infrastructure::observability::{TracingConfig, init_tracing};
use voxpulse::infrastructure::persistence::{create_pool, run_migrations};
use voxpulse::infrastructure::storage::AudioStoreFactory;
use voxpulse::presentation::{Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("failed to load configuration")?;

    let json_logs = settings.logging.enable_json
        || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_tracing(&TracingConfig::new(
        environment.as_str(),
        environment.is_production(),
        json_logs,
        settings.logging.level.as_deref(),
    ))
    .context("failed to install tracing subscriber")?;

    let audio_store =
        AudioStoreFactory::create(&settings.storage).context("failed to open audio store")?;
    let engine = TranscriptionEngineFactory::create(&settings.transcription)
        .context("failed to configure transcription provider")?;

    let backends = match settings.database.url.as_deref() {
        Some(url) => {
            let pool = create_pool(url, settings.database.max_connections).await?;
            run_migrations(&pool).await?;
            Backends::postgres(pool, audio_store, engine)
        }
        None => {
            tracing::warn!("No database.url configured, using in-memory repositories");
            Backends::in_memory(audio_store, engine)
        }
    };

    let app = assemble(&settings, backends);
    tokio::spawn(app.worker.run());

    let router = create_router(app.state, settings.ingestion.max_audio_bytes());

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
