//! Audit trail repository.
//!
//! This store is append-only: [`record`] is the only write, and nothing in
//! the codebase updates or deletes `audit_log` rows. [`record`] takes a
//! generic executor so destructive mutations can run it inside their own
//! transaction and commit the record together with the mutation.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use stockroom_core::AuditRecordId;

use super::RepositoryError;
use crate::models::{AuditAction, AuditRecord};

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    action: String,
    target_id: i64,
    target_name: String,
    performed_by: String,
    price: f64,
    quantity: i64,
    performed_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_record(self) -> Result<AuditRecord, RepositoryError> {
        let action = AuditAction::parse(&self.action).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid audit action: {:?}", self.action))
        })?;

        Ok(AuditRecord {
            id: AuditRecordId::new(self.id),
            action,
            target_id: self.target_id,
            target_name: self.target_name,
            performed_by: self.performed_by,
            price: self.price,
            quantity: self.quantity,
            performed_at: self.performed_at,
        })
    }
}

/// Append one audit record and return it as stored.
///
/// Assigns the next monotonic id and the current UTC timestamp. Run this on
/// the same transaction as the mutation it documents so the two commit
/// atomically.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn record<'e, E>(
    executor: E,
    action: AuditAction,
    target_id: i64,
    target_name: &str,
    performed_by: &str,
    price: f64,
    quantity: i64,
) -> Result<AuditRecord, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    let row = sqlx::query_as::<_, AuditRow>(
        "INSERT INTO audit_log
             (action, target_id, target_name, performed_by, price, quantity, performed_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING id, action, target_id, target_name, performed_by, price, quantity,
                   performed_at",
    )
    .bind(action.as_str())
    .bind(target_id)
    .bind(target_name)
    .bind(performed_by)
    .bind(price)
    .bind(quantity)
    .bind(now)
    .fetch_one(executor)
    .await?;

    row.into_record()
}

/// Read-side repository for the audit trail.
pub struct AuditRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every audit record, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored action is
    /// unknown.
    pub async fn list_all(&self) -> Result<Vec<AuditRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, action, target_id, target_name, performed_by, price, quantity,
                    performed_at
             FROM audit_log
             ORDER BY performed_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AuditRow::into_record).collect()
    }
}
