//! Time Tracker entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use timetracker::domain::SignupService;
use timetracker::domain::ports::AccountRepository;
use timetracker::inbound::http::health::HealthState;
use timetracker::inbound::http::session_config::session_settings;
use timetracker::inbound::http::state::HttpState;
use timetracker::outbound::memory::InMemoryAccountRepository;
use timetracker::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig, migrate};
use timetracker::outbound::security::Argon2PasswordHasher;
use timetracker::settings::{AppSettings, BuildMode};

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

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = AppSettings::load_from_iter(args)
        .map_err(|e| eyre!("failed to load configuration: {e}"))?;
    let mode = BuildMode::from_debug_assertions();

    let session = session_settings(&settings, mode).wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;
    let policy = settings.password_policy(mode);
    let repository = account_repository(&settings).await?;

    let signup = SignupService::new(repository, Arc::new(Argon2PasswordHasher), policy);
    let http_state = HttpState::new(Arc::new(signup), policy);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind_addr, http_state),
    )
    .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, password_min_length = policy.min_length(), "server listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}

async fn account_repository(settings: &AppSettings) -> Result<Arc<dyn AccountRepository>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database configured; accounts are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryAccountRepository::default()));
    };

    let applied = migrate(database_url.to_owned())
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;
    Ok(Arc::new(DieselAccountRepository::new(pool)))
}
