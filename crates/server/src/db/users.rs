//! User repository for database operations.
//!
//! Password hashes stay inside this module and the auth service; the `User`
//! model handed to routes never carries one.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stockroom_core::{Role, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Raw `users` row, converted into [`User`] after the stored username and
/// role re-validate.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let role = Role::parse(&self.role).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            username,
            role,
            created_at: self.created_at,
        })
    }
}

/// Fields of a sparse user patch; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role, created_at FROM users WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user's password hash by username, together with the user.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct HashRow {
            id: i64,
            username: String,
            role: String,
            created_at: DateTime<Utc>,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, HashRow>(
            "SELECT id, username, role, created_at, password_hash
             FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let hash = r.password_hash;
        let user = UserRow {
            id: r.id,
            username: r.username,
            role: r.role,
            created_at: r.created_at,
        }
        .into_user()?;

        Ok(Some((user, hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, role, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, username, role, created_at",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Create a user only if no user exists yet.
    ///
    /// The emptiness check and the insert are one guarded statement
    /// (`INSERT ... SELECT ... WHERE NOT EXISTS`), so of two racing calls
    /// against an empty table exactly one inserts; the other sees the row
    /// and returns `None`. A plain count-then-create would let both callers
    /// observe the empty table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_if_none_exist(
        &self,
        username: &Username,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, role, created_at)
             SELECT ?, ?, ?, ?
             WHERE NOT EXISTS (SELECT 1 FROM users)
             RETURNING id, username, role, created_at",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Apply a sparse patch to a user.
    ///
    /// Unsupplied fields keep their stored values. The read-merge-write runs
    /// in one transaction so a concurrent patch cannot interleave.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role, created_at FROM users WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .into_user()?;

        let username = patch.username.unwrap_or(current.username);
        let role = patch.role.unwrap_or(current.role);

        sqlx::query("UPDATE users SET username = ?, role = ? WHERE id = ?")
            .bind(username.as_str())
            .bind(role.as_str())
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("username already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        if let Some(hash) = patch.password_hash {
            sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
                .bind(&hash)
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(User {
            id,
            username,
            role,
            created_at: current.created_at,
        })
    }

    /// Delete a user, returning the deleted row.
    ///
    /// Returns `None` if the user didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "DELETE FROM users WHERE id = ?
             RETURNING id, username, role, created_at",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }
}
