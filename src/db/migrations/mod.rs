//! Database schema migrations.
//!
//! Migration files are stored in this directory with the naming convention:
//! - `migration_NN_up.sql` - Upgrades schema from version `NN-1` to version `NN`
//! - `migration_NN_down.sql` - Downgrades schema from version `NN` to version `NN-1`
//!
//! The current version lives in the single-row `schema_version` table, which is created by
//! `bootstrap` rather than by a migration.

use anyhow::{bail, Context, Result};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

/// The schema version this build of the program reads and writes.
pub(crate) const CURRENT_VERSION: i32 = 2;

struct Migration {
    /// The version this migration brings the database to (when going up).
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        up_sql: include_str!("migration_01_up.sql"),
        down_sql: include_str!("migration_01_down.sql"),
    },
    Migration {
        version: 2,
        up_sql: include_str!("migration_02_up.sql"),
        down_sql: include_str!("migration_02_down.sql"),
    },
];

/// Creates the `schema_version` table at version 0 if it does not exist yet, and returns the
/// version the database is currently at.
pub(crate) async fn bootstrap(pool: &SqlitePool) -> Result<i32> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await
        .context("Failed to create schema_version table")?;

    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;

    match row.0 {
        Some(version) => Ok(version),
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                .execute(pool)
                .await
                .context("Failed to insert initial schema version")?;
            Ok(0)
        }
    }
}

/// Moves the database from `current_ver` to `target_ver`, one migration at a time, up or down.
/// Each step runs in its own transaction together with the `schema_version` update. All needed
/// migrations are checked for before any of them run.
pub(crate) async fn run(pool: &SqlitePool, current_ver: i32, target_ver: i32) -> Result<()> {
    if current_ver == target_ver {
        debug!("Schema already at version {target_ver}");
        return Ok(());
    }
    if current_ver > CURRENT_VERSION {
        bail!(
            "The database schema is at version {current_ver} but this program only knows \
            version {CURRENT_VERSION}. Is a newer version of donations available?"
        );
    }

    validate_migrations(current_ver, target_ver)?;

    if current_ver < target_ver {
        for version in (current_ver + 1)..=target_ver {
            let migration = find(version)?;
            debug!("Running migration {version:02} (up)");
            run_single_migration(pool, migration.up_sql, version).await?;
        }
    } else {
        for version in (target_ver + 1..=current_ver).rev() {
            let migration = find(version)?;
            debug!("Running migration {version:02} (down)");
            run_single_migration(pool, migration.down_sql, version - 1).await?;
        }
    }

    debug!("Schema now at version {target_ver}");
    Ok(())
}

fn find(version: i32) -> Result<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .with_context(|| format!("Migration {version} not found"))
}

async fn run_single_migration(pool: &SqlitePool, sql: &str, new_version: i32) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    tx.execute(sql)
        .await
        .context("Failed to execute migration SQL")?;

    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(new_version)
        .execute(&mut *tx)
        .await
        .context("Failed to update schema_version")?;

    tx.commit()
        .await
        .context("Failed to commit migration transaction")
}

fn validate_migrations(current_version: i32, target_version: i32) -> Result<()> {
    let (start, end) = if current_version < target_version {
        (current_version + 1, target_version)
    } else {
        (target_version + 1, current_version)
    };

    for version in start..=end {
        if !MIGRATIONS.iter().any(|m| m.version == version) {
            bail!(
                "Migration {version} is missing but required to migrate from version \
                {current_version} to {target_version}"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap()
    }

    async fn schema_version(pool: &SqlitePool) -> i32 {
        let row: (i32,) = sqlx::query_as("SELECT version FROM schema_version")
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    async fn table_exists(pool: &SqlitePool, table_name: &str) -> bool {
        let row: (i32,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(table_name)
                .fetch_one(pool)
                .await
                .unwrap();
        row.0 > 0
    }

    #[tokio::test]
    async fn test_bootstrap_starts_at_zero_and_is_idempotent() {
        let pool = memory_pool().await;
        assert_eq!(bootstrap(&pool).await.unwrap(), 0);
        assert_eq!(bootstrap(&pool).await.unwrap(), 0);
        let rows: (i32,) = sqlx::query_as("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows.0, 1);
    }

    #[tokio::test]
    async fn test_migration_up_creates_donations() {
        let pool = memory_pool().await;
        let current = bootstrap(&pool).await.unwrap();
        run(&pool, current, CURRENT_VERSION).await.unwrap();
        assert_eq!(schema_version(&pool).await, CURRENT_VERSION);
        assert!(table_exists(&pool, "donations").await);
        assert_eq!(bootstrap(&pool).await.unwrap(), CURRENT_VERSION);
    }

    #[tokio::test]
    async fn test_migration_down_drops_donations() {
        let pool = memory_pool().await;
        bootstrap(&pool).await.unwrap();
        run(&pool, 0, 1).await.unwrap();
        run(&pool, 1, 0).await.unwrap();
        assert_eq!(schema_version(&pool).await, 0);
        assert!(!table_exists(&pool, "donations").await);
    }

    #[tokio::test]
    async fn test_migration_02_converts_text_dates_to_micros() {
        let pool = memory_pool().await;
        bootstrap(&pool).await.unwrap();
        run(&pool, 0, 1).await.unwrap();
        sqlx::query("INSERT INTO donations (id, date) VALUES ('a', ?), ('b', ?)")
            .bind("2024-08-30T12:00:00.000250Z")
            .bind("1969-12-31T23:59:59.500000Z")
            .execute(&pool)
            .await
            .unwrap();

        run(&pool, 1, 2).await.unwrap();
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT id, date FROM donations ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), 1_725_019_200_000_250),
                ("b".to_string(), -500_000),
            ]
        );
    }

    #[tokio::test]
    async fn test_migration_02_down_restores_text_dates() {
        let pool = memory_pool().await;
        bootstrap(&pool).await.unwrap();
        run(&pool, 0, 2).await.unwrap();
        sqlx::query("INSERT INTO donations (id, date) VALUES ('a', ?), ('b', ?)")
            .bind(1_725_019_200_000_250_i64)
            .bind(-500_000_i64)
            .execute(&pool)
            .await
            .unwrap();

        run(&pool, 2, 1).await.unwrap();
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, date FROM donations ORDER BY id")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(rows[0].1, "2024-08-30T12:00:00.000250Z");
        assert_eq!(rows[1].1, "1969-12-31T23:59:59.500000Z");
    }

    #[tokio::test]
    async fn test_migration_no_op_when_already_at_target() {
        let pool = memory_pool().await;
        bootstrap(&pool).await.unwrap();
        run(&pool, 0, 2).await.unwrap();
        run(&pool, 2, 2).await.unwrap();
        assert_eq!(schema_version(&pool).await, 2);
    }

    #[tokio::test]
    async fn test_newer_schema_is_refused() {
        let pool = memory_pool().await;
        bootstrap(&pool).await.unwrap();
        let err = run(&pool, CURRENT_VERSION + 1, CURRENT_VERSION)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("newer version"));
    }

    #[test]
    fn test_validate_migrations() {
        assert!(validate_migrations(0, 1).is_ok());
        assert!(validate_migrations(1, 0).is_ok());
        assert!(validate_migrations(0, 2).is_ok());
        assert!(validate_migrations(2, 0).is_ok());
        assert!(validate_migrations(0, 3).is_err());
        assert!(validate_migrations(1, 4).is_err());
    }
}
