// src/common/test_db.rs
//! Postgres helpers for database-backed tests
//!
//! Parallel test binaries share one database, so schema setup and table
//! resets take a session-level advisory lock and retry on deadlock.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

use super::migrations;

pub const SCHEMA_LOCK_KEY: i64 = 987_654_321;
pub const AUTH_LOCK_KEY: i64 = 987_654_322;
pub const GARDEN_LOCK_KEY: i64 = 987_654_323;
pub const PLANT_LOCK_KEY: i64 = 987_654_324;

const MAX_ATTEMPTS: u64 = 3;
const DEADLOCK_DETECTED: &str = "40P01";

/// Serialize database-backed tests inside one test binary
pub fn serial() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Connect to `TEST_DATABASE_URL` and bootstrap the schema, or `None` when unset
pub async fn connect() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&url)
        .await
        .ok()?;

    let mut conn = pool.acquire().await.ok()?;
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .ok()?;
    let migrated = migrations::run_migrations(&pool).await;
    let _ = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *conn)
        .await;
    migrated.ok()?;

    Some(pool)
}

fn is_deadlock(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == DEADLOCK_DETECTED)
}

async fn delete_all(conn: &mut PgConnection, tables: &[&str]) -> Result<(), sqlx::Error> {
    let mut tx = sqlx::Connection::begin(&mut *conn).await?;
    // DELETE rather than TRUNCATE avoids AccessExclusiveLock contention
    for table in tables {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

/// Empty `tables` (children first) under advisory lock `lock_key`
///
/// Retries up to three times with linear backoff when Postgres reports a
/// deadlock.
pub async fn reset_tables(pool: &PgPool, lock_key: i64, tables: &[&str]) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;

    for attempt in 1..=MAX_ATTEMPTS {
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(lock_key)
            .execute(&mut *conn)
            .await?;

        let result = delete_all(&mut *conn, tables).await;

        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(lock_key)
            .execute(&mut *conn)
            .await?;

        match result {
            Ok(()) => return Ok(()),
            Err(e) if is_deadlock(&e) && attempt < MAX_ATTEMPTS => {
                warn!(attempt, "Deadlock while resetting test tables, retrying");
                tokio::time::sleep(Duration::from_millis(50 * attempt)).await;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

pub async fn reset_auth_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    reset_tables(pool, AUTH_LOCK_KEY, &["auth_providers", "users"]).await
}

pub async fn reset_garden_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    reset_tables(pool, GARDEN_LOCK_KEY, &["user_plants", "gardens"]).await
}

pub async fn reset_plant_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    reset_tables(pool, PLANT_LOCK_KEY, &["user_plants", "plants"]).await
}
