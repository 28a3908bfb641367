//! Template-database provisioning for integration tests.
//!
//! A template database is migrated once per migrations hash; each test then
//! gets a fresh clone of it.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use timetracker::domain::ports::AccountPersistenceError;
use timetracker::outbound::persistence::run_pending_migrations;
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "timetracker_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, AccountPersistenceError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| AccountPersistenceError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, AccountPersistenceError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| AccountPersistenceError::query(format!("template check: {err:?}")))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| AccountPersistenceError::query(format!("create template: {err:?}")))?;

        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url)
            .map_err(|err| AccountPersistenceError::query(format!("migration: {err}")))?;
    }

    Ok(template_name)
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, AccountPersistenceError> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        let outcome = ensure_template_database(cluster).and_then(|template_name| {
            let db_name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(db_name.as_str(), template_name.as_str())
                .map_err(|error| {
                    AccountPersistenceError::query(format!(
                        "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
                    ))
                })
        });
        match outcome {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AccountPersistenceError::query("create database from template: exhausted retries")
    }))
}

/// Drops both signup tables to simulate schema loss.
pub fn drop_signup_tables(url: &str) -> Result<(), AccountPersistenceError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| AccountPersistenceError::connection(format_postgres_error(&err)))?;
    client
        .batch_execute("DROP TABLE IF EXISTS accounts; DROP TABLE IF EXISTS users;")
        .map_err(|err| AccountPersistenceError::query(format_postgres_error(&err)))?;
    Ok(())
}

/// Count rows in `table` directly, bypassing the repository.
pub fn count_rows(url: &str, table: &str) -> Result<i64, AccountPersistenceError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| AccountPersistenceError::connection(format_postgres_error(&err)))?;
    let row = client
        .query_one(format!("SELECT COUNT(*) FROM {table}").as_str(), &[])
        .map_err(|err| AccountPersistenceError::query(format_postgres_error(&err)))?;
    Ok(row.get(0))
}
