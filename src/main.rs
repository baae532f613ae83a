use tempo_api::api::{create_router, AppState};
use tempo_api::config::Config;
use tempo_api::store::SongStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // A failed load is terminal for serving capability: the process stays up
    // and answers 503 on every data route until restarted.
    let store = match SongStore::load(&config.data_file) {
        Ok(store) => {
            tracing::info!(tracks = store.len(), "Dataset loaded, recommendation engine ready");
            Some(store)
        }
        Err(err) => {
            tracing::error!(error = %err, data_file = %config.data_file, "Failed to load dataset");
            None
        }
    };

    let app = create_router(AppState::new(store));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
