use crate::database::create_pool;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use delirium_application::ports::RecordStore;
use delirium_domain::{DomainError, EvictionPolicy, Record};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use tracing::{error, info, instrument};

type RecordRow = (i64, i64, String, i64, i64);

const RECORD_COLUMNS: &str = "id, address, name, expires_at, expired";

/// Durable record store on a single SQLite table.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `database_url` and applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DomainError> {
        info!("Initializing database: {}", database_url);
        let pool = create_pool(database_url).await.map_err(|e| {
            error!(error = %e, "Failed to open record database");
            DomainError::StoreFailure(e.to_string())
        })?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_record(row: RecordRow) -> Result<Record, DomainError> {
        let (id, address, name, expires_at, expired) = row;

        let address = u32::try_from(address)
            .map(Ipv4Addr::from)
            .map_err(|_| DomainError::StoreFailure(format!("Corrupt address in record {}", id)))?;
        let expires_at = DateTime::<Utc>::from_timestamp_millis(expires_at).ok_or_else(|| {
            DomainError::StoreFailure(format!("Corrupt expiry in record {}", id))
        })?;

        let mut record = Record::new(id, name, address, expires_at);
        record.expired = expired != 0;
        Ok(record)
    }

    fn rows_to_records(rows: Vec<RecordRow>) -> Result<Vec<Record>, DomainError> {
        rows.into_iter().map(Self::row_to_record).collect()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    #[instrument(skip(self))]
    async fn upsert_active(
        &self,
        name: &str,
        address: Ipv4Addr,
        ttl_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Record, DomainError> {
        let expires_at = (now + Duration::seconds(i64::from(ttl_secs))).timestamp_millis();

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin upsert transaction");
            DomainError::StoreFailure(e.to_string())
        })?;

        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM records WHERE name = ? AND expired = 0 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query active record by name");
            DomainError::StoreFailure(e.to_string())
        })?;

        let row = match existing {
            Some((id,)) => sqlx::query_as::<_, RecordRow>(&format!(
                "UPDATE records SET expires_at = MAX(expires_at, ?)
                 WHERE id = ?
                 RETURNING {}",
                RECORD_COLUMNS
            ))
            .bind(expires_at)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to refresh record");
                DomainError::StoreFailure(e.to_string())
            })?,
            None => sqlx::query_as::<_, RecordRow>(&format!(
                "INSERT INTO records (address, name, expires_at, expired)
                 VALUES (?, ?, ?, 0)
                 RETURNING {}",
                RECORD_COLUMNS
            ))
            .bind(i64::from(u32::from(address)))
            .bind(name)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to insert record");
                DomainError::StoreFailure(e.to_string())
            })?,
        };

        tx.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit upsert transaction");
            DomainError::StoreFailure(e.to_string())
        })?;

        Self::row_to_record(row)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str, expired: bool) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {} FROM records WHERE name = ? AND expired = ? ORDER BY id",
            RECORD_COLUMNS
        ))
        .bind(name)
        .bind(expired)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query records by name");
            DomainError::StoreFailure(e.to_string())
        })?;

        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_address(
        &self,
        address: Ipv4Addr,
        expired: bool,
    ) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {} FROM records WHERE address = ? AND expired = ? ORDER BY id",
            RECORD_COLUMNS
        ))
        .bind(i64::from(u32::from(address)))
        .bind(expired)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query records by address");
            DomainError::StoreFailure(e.to_string())
        })?;

        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, expired: bool) -> Result<Vec<Record>, DomainError> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {} FROM records WHERE expired = ? ORDER BY id",
            RECORD_COLUMNS
        ))
        .bind(expired)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query records by status");
            DomainError::StoreFailure(e.to_string())
        })?;

        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn sweep_expired(
        &self,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let sql = match policy {
            EvictionPolicy::Mark => {
                "UPDATE records SET expired = 1 WHERE expired = 0 AND expires_at <= ?"
            }
            EvictionPolicy::Delete => "DELETE FROM records WHERE expires_at <= ?",
        };

        let result = sqlx::query(sql)
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, policy = %policy, "Failed to sweep expired records");
                DomainError::StoreFailure(e.to_string())
            })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn active_addresses(&self) -> Result<HashSet<Ipv4Addr>, DomainError> {
        let rows = sqlx::query_as::<_, (i64,)>("SELECT DISTINCT address FROM records WHERE expired = 0")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query active addresses");
                DomainError::StoreFailure(e.to_string())
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(address,)| u32::try_from(address).ok().map(Ipv4Addr::from))
            .collect())
    }
}
