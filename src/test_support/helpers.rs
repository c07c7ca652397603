use crate::configuration::DatabaseSettings;
use crate::telemetry::{get_subscriber, init_subscriber};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::future::Future;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 50;

// This holds the guard for the entire lifetime of the test process
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
pub static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    let loglevel = std::env::var("LOGLEVEL").unwrap_or(default_filter_level);

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, loglevel, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, loglevel, test_writer());
        init_subscriber(subscriber);
    }
});

/// One log file per test under `tests/logs/`.
pub fn test_writer() -> NonBlocking {
    let test_name = std::env::args()
        .skip_while(|arg| arg != "--exact")
        .nth(1)
        .map(|arg| arg.replace("::", "-"))
        .unwrap_or_else(|| "all_tests".into())
        .replace(' ', "_");

    let _ = std::fs::create_dir_all("tests/logs");

    let file_appender =
        tracing_appender::rolling::never("tests/logs", format!("{}.log", test_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    if let Ok(mut slot) = LOG_GUARD.lock() {
        *slot = Some(guard);
    }

    non_blocking
}

/// Retry `operation` with exponential backoff, for infrastructure that may still be starting.
pub async fn with_backoff<T, E, F, Fut>(what: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS => {
                let delay_ms = INITIAL_BACKOFF_MS << (attempt - 1);
                tracing::debug!(
                    "Failed to {} (attempt {}/{}), retrying in {}ms: {:?}",
                    what,
                    attempt,
                    MAX_ATTEMPTS,
                    delay_ms,
                    e
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Recreate the test database from scratch and run the migrations on it.
pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    assert!(
        config.database_name.starts_with("test-"),
        "configure_database only drops test databases (name must start with 'test-'), got '{}'",
        config.database_name
    );

    let maintenance_settings = DatabaseSettings {
        database_name: "postgres".to_string(),
        ..config.clone()
    };

    let maintenance_options = maintenance_settings.connect_options();
    let mut connection = with_backoff("connect to the maintenance database", || {
        PgConnection::connect_with(&maintenance_options)
    })
    .await
    .expect("Failed to connect to Postgres.");

    connection
        .execute(
            format!(
                r#"
                SELECT pg_terminate_backend(pg_stat_activity.pid)
                FROM pg_stat_activity
                WHERE pg_stat_activity.datname = '{}'
                  AND pid <> pg_backend_pid();
                "#,
                config.database_name
            )
            .as_str(),
        )
        .await
        .expect("Failed to terminate connections.");
    connection
        .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to drop database.");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");
    drop(connection);

    let connection_pool = with_backoff("connect to the test database", || {
        PgPool::connect_with(config.connect_options())
    })
    .await
    .expect("Failed to connect to the test database.");

    let migrator = sqlx::migrate!("./migrations");
    with_backoff("run migrations", || migrator.run(&connection_pool))
    .await
    .expect("Failed to migrate the database.");

    connection_pool
}

/// Purge every persisted record so a run starts from an empty baseline.
#[tracing::instrument(name = "Resetting database", skip(pool))]
pub async fn reset_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE bookmarks, users CASCADE")
        .execute(pool)
        .await?;
    Ok(())
}
