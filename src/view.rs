//! A donation list that stays current with the store.

use crate::db::{Changes, Db};
use crate::model::Donation;
use crate::{Error, Result};
use tracing::trace;

/// Holds the rows of `Db::list` and re-reads them whenever the store reports a commit.
#[derive(Debug)]
pub struct ListView {
    db: Db,
    changes: Changes,
    rows: Vec<Donation>,
}

impl ListView {
    /// Subscribes to `db` and loads the initial rows. Subscribing first means no commit can slip
    /// in between the first read and the subscription.
    pub async fn open(db: Db) -> Result<Self> {
        let mut changes = db.subscribe();
        changes.borrow_and_update();
        let rows = db.list().await?;
        Ok(Self { db, changes, rows })
    }

    /// The rows as of the last read, most recent first.
    pub fn rows(&self) -> &[Donation] {
        &self.rows
    }

    /// Waits for the next commit and then re-reads the rows.
    pub async fn changed(&mut self) -> Result<&[Donation]> {
        self.changes
            .changed()
            .await
            .map_err(|_| Error::StorageFailure("The donation store was dropped".to_string()))?;
        self.reload().await?;
        Ok(&self.rows)
    }

    /// Re-reads the rows only if a commit happened since the last read. Returns whether it did.
    pub async fn refresh_if_changed(&mut self) -> Result<bool> {
        let changed = self
            .changes
            .has_changed()
            .map_err(|_| Error::StorageFailure("The donation store was dropped".to_string()))?;
        if changed {
            self.reload().await?;
        }
        Ok(changed)
    }

    async fn reload(&mut self) -> Result<()> {
        let revision = *self.changes.borrow_and_update();
        self.rows = self.db.list().await?;
        trace!("List view reloaded at revision {revision}");
        Ok(())
    }
}
