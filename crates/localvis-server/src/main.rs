mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use localvis_engine::Engine;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = localvis_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let engine_config = localvis_core::load_engine_config(&config.engine_config_path)?;
    let mut engine = Engine::new(Arc::new(engine_config))?;
    if let Some(table) = config.default_weight_table.as_deref() {
        engine = engine.with_default_table(table)?;
    }
    tracing::info!(
        env = %config.env,
        engine_config = %config.engine_config_path.display(),
        default_weight_table = engine.default_table_name(),
        markets = engine.config().markets.len(),
        "engine configuration loaded"
    );

    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60))
        .trust_forwarded_for(config.trust_forwarded_for);
    let app = build_app(
        AppState {
            engine: Arc::new(engine),
        },
        rate_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
