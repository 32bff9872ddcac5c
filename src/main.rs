use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use s3_presign_server::auth::ApiKey;
use s3_presign_server::config::PresignConfig;
use s3_presign_server::router::build_presign_router;
use s3_presign_server::signer::s3::S3UrlSigner;
use s3_presign_server::state::PresignServerState;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // setup tracing and logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // configuration must be complete before anything is bound
    let config = match PresignConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(var = err.var_name(), "{err}");
            return ExitCode::FAILURE;
        }
    };

    // configure url signer
    let signer = Arc::new(S3UrlSigner::from_config(&config).await);

    // initialize server state
    let state = PresignServerState::from_config(&config, signer);

    // start server
    let svc = build_presign_router(Arc::new(state), ApiKey::new(config.api_key()));
    let app = svc.layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port()));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, error = %err, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    info!(
        bucket = config.bucket(),
        expires_in = config.expires_in().as_secs(),
        "presign listening on {}",
        config.port()
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    info!("server shutdown complete");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("received terminate signal, starting graceful shutdown"),
    }
}
