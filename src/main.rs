use anyhow::Context;
use performance_predictor::{router, Artifacts, Config, Predictor};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().context("failed loading configuration")?;
    info!(
        bind = %config.server.bind,
        artifact_dir = %config.artifacts.dir.display(),
        "configuration loaded"
    );

    let artifacts = Artifacts::load(&config.artifacts).context("failed loading artifacts")?;
    let app = router(Predictor::new(artifacts));

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed binding {}", config.server.bind))?;
    info!(addr = %config.server.bind, "prediction service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("prediction service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl-C, shutting down");
    }
}
