use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use courierds::logging::init_tracing;
use courierds::metrics::{init_metrics, metrics_app};
use courierds::router::init_router;
use courierds::state::init_app_state;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let state = init_app_state()
        .await
        .context("failed to initialize application state")?;
    let server_config = state.server_config.clone();

    if server_config.is_production() && state.jwt_config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the built-in development secret");
    }

    match init_metrics() {
        Ok(Some(handle)) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], server_config.metrics_port));
            tokio::spawn(async move {
                match tokio::net::TcpListener::bind(addr).await {
                    Ok(listener) => {
                        info!(%addr, "Metrics available at /metrics");
                        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                            error!(error = %e, "Metrics server stopped");
                        }
                    }
                    Err(e) => error!(error = %e, %addr, "Failed to bind metrics listener"),
                }
            });
        }
        Ok(None) => info!("Observability disabled, skipping metrics exporter"),
        Err(e) => warn!(error = %e, "Failed to install metrics recorder"),
    }

    if let Some(limiter) = state.auth_rate_limiter.clone() {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(LIMITER_PURGE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.purge_stale();
            }
        });
    }

    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        environment = %server_config.environment,
        version = %server_config.version,
        "Server running"
    );
    info!("Swagger UI available at http://localhost:{}/swagger-ui", server_config.port);
    info!("Scalar UI available at http://localhost:{}/scalar", server_config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
