//! Backend entry-point: loads settings, migrates the store and serves the API.

mod server;

use actix_web::dev::ServerHandle;
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bookshelf::inbound::http::health::HealthState;
use bookshelf::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use bookshelf::outbound::security::{BuildMode, token_settings_from_env};
use bookshelf::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let database_url = settings.database_url()?;
    let bind_addr = settings.bind_addr()?;
    let token_settings =
        token_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::from_debug_assertions())?;

    let health_state = web::Data::new(HealthState::new());
    apply_migrations(database_url).await?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await?;
    if !health_state.mark_migrated() {
        warn!(stage = ?health_state.stage(), "unexpected lifecycle stage after migrations");
    }

    let config = ServerConfig::new(bind_addr, pool, token_settings)
        .with_covers_dir(settings.covers_dir())
        .with_forbidden_publishers(settings.forbidden_publishers())
        .with_password_hash_cost(settings.password_hash_cost());

    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on_signal(health_state, server.handle()));
    info!(%bind_addr, "bookshelf listening");
    server.await?;
    Ok(())
}

/// Fail the probes, then stop the server gracefully on Ctrl-C or SIGTERM.
async fn drain_on_signal(health_state: web::Data<HealthState>, handle: ServerHandle) {
    shutdown_signal().await;
    health_state.mark_draining();
    info!("shutdown requested; draining");
    handle.stop(true).await;
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                () = ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(error) => {
            warn!(%error, "SIGTERM handler unavailable; waiting for Ctrl-C");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    ctrl_c().await;
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
