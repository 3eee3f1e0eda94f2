use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quarry_catalog::Inspector;
use quarry_pool::ConnectionPool;
use quarry_server::args::{Args, LogFormat};
use quarry_server::{build_router, AppState};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let catalog = Inspector::scan(&args.db).context("failed to inspect database files")?;
    tracing::info!(databases = catalog.len(), "catalog built");

    let catalog = Arc::new(catalog);
    let pool = Arc::new(ConnectionPool::new(
        Arc::clone(&catalog),
        args.num_threads,
        args.sql_time_limit_ms,
    ));
    let state = Arc::new(AppState::new(catalog, pool, &args));

    let router = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
    }
}
