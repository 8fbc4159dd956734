// src/common/migrations.rs
//! Database schema bootstrap

use sqlx::PgPool;
use std::env;
use tracing::{info, warn};

/// Tables in dependency order (children last)
pub const TABLES: [&str; 5] = ["users", "auth_providers", "gardens", "plants", "user_plants"];

const SCHEMA: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        picture_url TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_providers (
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        provider TEXT NOT NULL CHECK (provider IN ('local', 'google')),
        provider_user_id TEXT,
        password_hash TEXT,
        refresh_token TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (user_id, provider)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gardens (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        location TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS plants (
        id TEXT PRIMARY KEY,
        common_name TEXT NOT NULL,
        family TEXT,
        cultivar TEXT,
        species_epithet TEXT,
        genus TEXT,
        watering_frequency_days INTEGER NOT NULL,
        sunlight TEXT[],
        external_api_id BIGINT UNIQUE,
        is_custom BOOLEAN NOT NULL DEFAULT FALSE,
        custom_watering_frequency_days INTEGER,
        default_image TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_plants (
        id TEXT PRIMARY KEY,
        garden_id TEXT NOT NULL REFERENCES gardens(id) ON DELETE CASCADE,
        plant_id TEXT NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
        planted_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_gardens_user_id ON gardens(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_user_plants_garden_id ON user_plants(garden_id)",
];

/// Create all tables inside one transaction
///
/// Set `RESET_DB=true` to drop existing tables first.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    let mut tx = pool.begin().await?;

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        for table in TABLES.iter().rev() {
            sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
                .execute(&mut *tx)
                .await?;
        }
    }

    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!(tables = TABLES.len(), "Database schema ready");
    Ok(())
}
