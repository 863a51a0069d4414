//! Crop Advisor - Backend Server

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisor::{artifacts::ArtifactStatus, create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crop Advisor Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Advice endpoint: {}", config.advice.endpoint);

    // Artifacts are loaded exactly once; a failure keeps the server up without predictions
    let artifacts = ArtifactStatus::load(&config.artifacts);
    if !artifacts.is_ready() {
        tracing::warn!("Predictions are disabled until the artifacts are fixed and the server restarted");
    }

    let server = config.server.clone();
    let state = AppState::new(config, artifacts)?;

    // Build application
    let app = create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
