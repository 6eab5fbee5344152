//! This module is responsible for reading, writing and managing the SQLite database that holds
//! donation records.

mod migrations;

use crate::error::{IntoResult, Result};
use crate::model::{Amount, Donation, DonationFields, DonationId};
use crate::validate::parse_donation_type;
use crate::Error;
use anyhow::Context;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

macro_rules! select_donations {
    ($tail:literal) => {
        concat!(
            "SELECT id, donor_name, amount, donation_category, donation_type, date, phone, city, ",
            "state, country FROM donations ",
            $tail
        )
    };
}

/// The record store. Cloning a `Db` gives another handle to the same database and the same
/// change notifications.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
    changes: Arc<watch::Sender<u64>>,
}

/// A subscription to store changes. The value is a revision counter that increases by one for
/// every successful commit.
pub type Changes = watch::Receiver<u64>;

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    pub async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(Error::Config(anyhow::anyhow!(
                "A database already exists at '{}'",
                path.display()
            )));
        }
        let options = file_options(path).create_if_missing(true);
        Self::connect(options).await
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Updates the database schema with migrations if it is out-of-date
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Config(anyhow::anyhow!(
                "The database file is missing '{}'",
                path.display()
            )));
        }
        Self::connect(file_options(path)).await
    }

    /// Creates an empty store that lives only in memory, for tests and previews.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        // A single connection that never expires: writes are serialized and an in-memory database
        // survives for as long as the pool does.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        migrate(&pool).await.storage_result()?;

        let (changes, _) = watch::channel(0);
        Ok(Self {
            pool,
            changes: Arc::new(changes),
        })
    }

    /// Closes the database. Every operation after this fails with `Error::StorageFailure`.
    pub async fn close(&self) {
        self.pool.close().await
    }

    /// Subscribes to change notifications. The receiver is marked changed after each successful
    /// create, update or delete.
    pub fn subscribe(&self) -> Changes {
        self.changes.subscribe()
    }

    /// Returns every donation, most recent `date` first. Donations sharing a date are returned
    /// newest insertion first.
    pub async fn list(&self) -> Result<Vec<Donation>> {
        let rows = sqlx::query(select_donations!("ORDER BY date DESC, rowid DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(donation_from_row).collect()
    }

    /// Returns the donation with `id`, if there is one.
    pub async fn get(&self, id: DonationId) -> Result<Option<Donation>> {
        let row = sqlx::query(select_donations!("WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(donation_from_row).transpose()
    }

    /// Returns the number of donations in the store.
    pub async fn count(&self) -> Result<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM donations")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(row.0).unwrap_or_default())
    }

    /// Stores a new donation with a freshly generated id and returns it.
    pub async fn create(&self, fields: &DonationFields) -> Result<Donation> {
        let id = DonationId::new();
        let fields = stored_precision(fields);
        sqlx::query(
            "INSERT INTO donations \
            (id, donor_name, amount, donation_category, donation_type, date, phone, city, state, \
            country) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&fields.donor_name)
        .bind(fields.amount.to_string())
        .bind(&fields.donation_category)
        .bind(fields.donation_type.to_string())
        .bind(encode_date(fields.date))
        .bind(&fields.phone)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .execute(&self.pool)
        .await?;

        debug!("Created donation {id}");
        self.notify();
        Ok(Donation::new(id, fields))
    }

    /// Stores an empty donation dated now. Every other field is left blank until edited.
    pub async fn quick_add(&self) -> Result<Donation> {
        self.create(&DonationFields::default()).await
    }

    /// Overwrites every mutable field of the donation with `id`.
    ///
    /// # Errors
    /// - `Error::NotFound` if no donation has this id.
    /// - `Error::StorageFailure` if the write fails.
    pub async fn update(&self, id: DonationId, fields: &DonationFields) -> Result<Donation> {
        let fields = stored_precision(fields);
        let result = sqlx::query(
            "UPDATE donations SET donor_name = ?, amount = ?, donation_category = ?, \
            donation_type = ?, date = ?, phone = ?, city = ?, state = ?, country = ? \
            WHERE id = ?",
        )
        .bind(&fields.donor_name)
        .bind(fields.amount.to_string())
        .bind(&fields.donation_category)
        .bind(fields.donation_type.to_string())
        .bind(encode_date(fields.date))
        .bind(&fields.phone)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }

        debug!("Updated donation {id}");
        self.notify();
        Ok(Donation::new(id, fields))
    }

    /// Deletes every donation in `ids` in a single transaction and returns the ids that were
    /// actually removed. Ids that do not exist are skipped. If anything fails, nothing is deleted.
    pub async fn delete(&self, ids: &[DonationId]) -> Result<Vec<DonationId>> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = Vec::new();
        for &id in ids {
            if deleted.contains(&id) {
                continue;
            }
            let result = sqlx::query("DELETE FROM donations WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                trace!("Donation {id} was not found, skipping");
            } else {
                deleted.push(id);
            }
        }
        tx.commit().await?;

        debug!("Deleted {} donation(s)", deleted.len());
        if !deleted.is_empty() {
            self.notify();
        }
        Ok(deleted)
    }

    fn notify(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }
}

fn file_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new().filename(path)
}

async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let current = migrations::bootstrap(pool).await?;
    migrations::run(pool, current, migrations::CURRENT_VERSION)
        .await
        .context("Unable to migrate the database schema")
}

/// Dates are stored as microseconds since the Unix epoch so that ordering by the column is
/// chronological for every date chrono can represent.
fn encode_date(date: DateTime<Utc>) -> i64 {
    date.timestamp_micros()
}

/// Drops precision the date column cannot hold, so a returned record equals what a later read gives.
fn stored_precision(fields: &DonationFields) -> DonationFields {
    DonationFields {
        date: fields.date.trunc_subsecs(6),
        ..fields.clone()
    }
}

fn decode_date(micros: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .with_context(|| format!("Invalid date '{micros}' in database"))
}

fn donation_from_row(row: &SqliteRow) -> Result<Donation> {
    let raw_id: String = row.try_get("id")?;
    let id = DonationId::from_str(&raw_id)
        .map_err(|e| Error::StorageFailure(format!("Invalid donation id '{raw_id}': {e}")))?;

    let raw_amount: String = row.try_get("amount")?;
    let amount = Amount::from_str(&raw_amount).unwrap_or_else(|e| {
        warn!("Donation {id} has an unreadable amount '{raw_amount}' ({e}), using 0.00");
        Amount::ZERO
    });

    let raw_type: String = row.try_get("donation_type")?;
    let raw_date: i64 = row.try_get("date")?;
    let date = decode_date(raw_date).storage_result()?;

    Ok(Donation::new(
        id,
        DonationFields {
            donor_name: row.try_get("donor_name")?,
            amount,
            donation_category: row.try_get("donation_category")?,
            donation_type: parse_donation_type(&raw_type),
            date,
            phone: row.try_get("phone")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            country: row.try_get("country")?,
        },
    ))
}
