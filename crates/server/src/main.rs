use axum::extract::DefaultBodyLimit;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use server::config::{self, ServerConfig};
use server::{db, health, openapi, repo, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server exited with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env()?;
    let flags = config::load_feature_flags();
    health::record_start_time();

    let tracer_provider = if flags.telemetry {
        telemetry::init_telemetry()
    } else {
        None
    };

    let pool = db::create_pool(&server_config)?;
    db::run_migrations(&pool).await?;

    match repo::user::purge_expired_revocations(&pool).await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "dropped expired token revocations"),
        Err(e) => tracing::warn!(error = %e, "could not purge expired token revocations"),
    }

    let state = db::AppState { pool };

    let app = openapi::app_router(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    tracing::info!(addr = %server_config.bind_addr, docs = flags.docs, "courtdesk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "tracer provider shutdown failed");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
