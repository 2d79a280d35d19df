mod app;
mod config;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::app::StaticSettings;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = StaticSettings {
        dir: config::static_dir(),
        asset_max_age_secs: config::asset_max_age_secs(),
    };
    if !settings.dir.join("provinces.json").is_file() {
        tracing::warn!(
            static_dir = %settings.dir.display(),
            "provinces.json not found; run province-map-generator first"
        );
    }
    tracing::info!(
        static_dir = %settings.dir.display(),
        asset_max_age_secs = settings.asset_max_age_secs,
        "serving province map assets"
    );

    let app = app::build_app(settings);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Province map server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
