//! Product repository for database operations.
//!
//! Destructive deletion lives here as a single transactional unit: the
//! pre-delete snapshot, the audit record, and the row deletion commit
//! together or not at all.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::{ProductId, UserId};

use super::RepositoryError;
use crate::db::audit;
use crate::models::{AuditAction, AuditRecord, Product};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    quantity: i64,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
            owner_id: row.owner_id.map(UserId::new),
            created_at: row.created_at,
        }
    }
}

/// Fields of a sparse product patch; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: f64,
        quantity: i64,
        owner_id: Option<UserId>,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (name, description, price, quantity, owner_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, name, description, price, quantity, owner_id, created_at",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(quantity)
        .bind(owner_id.map(|id| id.as_i64()))
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, quantity, owner_id, created_at
             FROM products WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, quantity, owner_id, created_at
             FROM products ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List all products owned by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, quantity, owner_id, created_at
             FROM products WHERE owner_id = ? ORDER BY id ASC",
        )
        .bind(owner_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a sparse patch to a product.
    ///
    /// Unsupplied fields keep their stored values. The read-merge-write runs
    /// in one transaction so a concurrent patch cannot interleave.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Product = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, quantity, owner_id, created_at
             FROM products WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .into();

        let name = patch.name.unwrap_or(current.name);
        let description = patch.description.or(current.description);
        let price = patch.price.unwrap_or(current.price);
        let quantity = patch.quantity.unwrap_or(current.quantity);

        sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ?, quantity = ?
             WHERE id = ?",
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(quantity)
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Product {
            id,
            name,
            description,
            price,
            quantity,
            owner_id: current.owner_id,
            created_at: current.created_at,
        })
    }

    /// Delete a product, recording the deletion in the audit trail.
    ///
    /// Runs as one transaction: the `DELETE ... RETURNING` snapshots the
    /// row's pre-delete state and takes the write lock in a single
    /// statement, then the audit record is appended from that snapshot.
    /// Either the deletion and its audit record both commit, or neither
    /// does. Of two racing deletes, exactly one sees the row; the other
    /// gets `NotFound` and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist (no
    /// audit record is written).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_with_audit(
        &self,
        id: ProductId,
        performed_by: &str,
    ) -> Result<AuditRecord, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, ProductRow>(
            "DELETE FROM products WHERE id = ?
             RETURNING id, name, description, price, quantity, owner_id, created_at",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = deleted else {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        };
        let product: Product = row.into();

        let record = audit::record(
            &mut *tx,
            AuditAction::DeleteProduct,
            id.as_i64(),
            &product.name,
            performed_by,
            product.price,
            product.quantity,
        )
        .await?;

        tx.commit().await?;

        Ok(record)
    }
}
