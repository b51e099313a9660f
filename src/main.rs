//! Survivor league backend entrypoint wiring the league gateway, REST, and SSE layers.

use std::{env, net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::league_store::{
    LeagueStore,
    memory::{MemoryLeagueStore, SeedData},
};
use services::league_service;
use state::{AppState, SharedState};

/// JSON file with initial rows for the in-memory gateway.
const SEED_PATH_ENV: &str = "LEAGUE_SEED_PATH";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_config = AppConfig::load();
    let store = build_store()?;
    let app_state = AppState::new(store, app_config);

    tokio::spawn(initial_load(app_state.clone()));
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the league gateway: the REST gateway when its environment is set, otherwise the
/// in-memory store, seeded from [`SEED_PATH_ENV`] when present.
fn build_store() -> anyhow::Result<Arc<dyn LeagueStore>> {
    #[cfg(feature = "rest-store")]
    if dao::league_store::rest::RestConfig::is_configured() {
        use dao::league_store::rest::{RestConfig, RestLeagueStore};

        let rest_config = RestConfig::from_env().context("reading gateway configuration")?;
        let store = RestLeagueStore::connect(rest_config).context("building gateway client")?;
        info!("using REST league gateway");
        return Ok(Arc::new(store));
    }

    let store = match env::var_os(SEED_PATH_ENV) {
        Some(path) => {
            let path = Path::new(&path);
            let seed = SeedData::from_path(path).context("loading league seed")?;
            info!(path = %path.display(), "using in-memory league gateway seeded from file");
            MemoryLeagueStore::from_seed(seed)
        }
        None => {
            warn!("no league gateway configured; starting with an empty in-memory league");
            MemoryLeagueStore::new()
        }
    };
    Ok(Arc::new(store))
}

/// Load the first snapshot in the background so the server answers while the gateway is slow.
async fn initial_load(state: SharedState) {
    if let Err(err) = league_service::refresh(&state).await {
        warn!(error = %err, "initial league load failed; waiting for an explicit refresh");
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
