use anyhow::{Context, Result};
use clap::Parser;
use crowd_server_rs::services::crowd::CrowdSampler;
use crowd_server_rs::store::{SqliteStore, Store};
use crowd_server_rs::time::{Clock, SystemClock};
use crowd_server_rs::{cli, config, db, openapi, routes, state};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind crowd-server-rs listener on {addr}: port already in use. Stop the other service using this port or re-run with --port to choose another port.",
            );
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to bind crowd-server-rs listener on {addr}"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if args.print_openapi {
        println!(
            "{}",
            serde_json::to_string_pretty(&openapi::openapi_json())?
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::ServerConfig::from_env()?;
    let pool = db::connect(&config.database_path).await?;
    db::migrate(&pool)
        .await
        .context("failed to apply database schema")?;

    if config.create_default_sniffer {
        if let Err(err) = db::ensure_default_sniffer(&pool).await {
            tracing::warn!("failed to ensure default sniffer exists: {err:#}");
        }
    }

    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sampler =
        Arc::new(CrowdSampler::new(clock.clone()).with_window(config.crowd_window_seconds));

    let state = state::AppState {
        config,
        store,
        clock,
        sampler,
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(20)
            .burst_size(60)
            .methods(vec![axum::http::Method::POST, axum::http::Method::PUT])
            .use_headers()
            .finish()
            .context("failed to build rate limiter config")?,
    );

    let governor_limiter = governor_conf.limiter().clone();
    std::thread::spawn(move || loop {
        std::thread::sleep(std::time::Duration::from_secs(60));
        governor_limiter.retain_recent();
    });

    let app = routes::router(state)
        .layer(GovernorLayer::new(governor_conf))
        .layer(CorsLayer::permissive());
    let addr = format!("{}:{}", args.host, args.port);
    let listener = bind_listener(&addr).await?;
    tracing::info!(addr = %addr, "crowd-server-rs listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
