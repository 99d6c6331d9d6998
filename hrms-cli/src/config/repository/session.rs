//! Staff store sessions: the write path shared by imports and manual edits

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::staff;
use crate::roster::types::StaffRecord;

/// Record store used by the import engine and the manual entry commands
///
/// Writes are only durable after `commit`.
#[async_trait]
pub trait StaffStore: Send {
    /// Fetch a staff record by PF number
    async fn get(&mut self, pf_no: &str) -> Result<Option<StaffRecord>>;

    /// Insert or overwrite a record keyed by PF number
    async fn merge(&mut self, record: &StaffRecord) -> Result<()>;

    /// Insert a new record, failing if the PF number exists
    async fn add(&mut self, record: &StaffRecord) -> Result<()>;

    /// Make all writes of this session durable
    async fn commit(&mut self) -> Result<()>;
}

/// A transaction on the SQLite store
///
/// Dropping the session without committing rolls the transaction back.
pub struct SqliteSession {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteSession {
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let tx = pool.begin().await.context("Failed to start transaction")?;
        Ok(Self { tx: Some(tx) })
    }

    fn tx(&mut self) -> Result<&mut Transaction<'static, Sqlite>> {
        self.tx.as_mut().context("Session has already been committed")
    }
}

#[async_trait]
impl StaffStore for SqliteSession {
    async fn get(&mut self, pf_no: &str) -> Result<Option<StaffRecord>> {
        let tx = self.tx()?;
        staff::get_staff(&mut **tx, pf_no).await
    }

    async fn merge(&mut self, record: &StaffRecord) -> Result<()> {
        let tx = self.tx()?;
        staff::upsert_staff(&mut **tx, record).await
    }

    async fn add(&mut self, record: &StaffRecord) -> Result<()> {
        let tx = self.tx()?;
        staff::insert_staff(&mut **tx, record).await
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self.tx.take().context("Session has already been committed")?;
        tx.commit().await.context("Failed to commit transaction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::test_pool;

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let pool = test_pool().await;

        let mut session = SqliteSession::begin(&pool).await.unwrap();
        session.merge(&StaffRecord::new("PF1")).await.unwrap();
        assert!(session.get("PF1").await.unwrap().is_some());
        session.commit().await.unwrap();

        assert!(staff::get_staff(&pool, "PF1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let pool = test_pool().await;

        {
            let mut session = SqliteSession::begin(&pool).await.unwrap();
            session.merge(&StaffRecord::new("PF1")).await.unwrap();
        }

        assert!(staff::get_staff(&pool, "PF1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_existing_pf_no() {
        let pool = test_pool().await;

        let mut session = SqliteSession::begin(&pool).await.unwrap();
        session.add(&StaffRecord::new("PF1")).await.unwrap();
        assert!(session.add(&StaffRecord::new("PF1")).await.is_err());
        session.commit().await.unwrap();

        assert!(session.commit().await.is_err());
    }
}
