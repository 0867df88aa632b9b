//! User repository.
//!
//! The embedded address sequence is a JSON column, mutated in place with
//! `SQLite`'s JSON functions so that every mutation is one atomic
//! single-row statement. There is never an intermediate state a concurrent
//! reader could observe.

use chrono::Utc;
use sqlx::SqlitePool;

use mercado_core::types::{Address, AddressId, Email, Role, UserId};

use crate::models::User;

use super::{RepositoryError, conflict_on_unique, corrupt, to_json};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    uid: String,
    email: String,
    role: String,
    name: Option<String>,
    surname: Option<String>,
    phone_locale: Option<String>,
    phone_number: Option<String>,
    addresses: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            uid: self.uid,
            email: Email::parse(&self.email).map_err(|e| corrupt("email", e))?,
            role: self.role.parse().map_err(|e| corrupt("role", e))?,
            name: self.name,
            surname: self.surname,
            phone_locale: self
                .phone_locale
                .map(|l| l.parse().map_err(|e| corrupt("phone locale", e)))
                .transpose()?,
            phone_number: self.phone_number,
            addresses: serde_json::from_str(&self.addresses)
                .map_err(|e| corrupt("addresses", e))?,
        })
    }
}

const SELECT_USER: &str = "SELECT id, uid, email, role, name, surname, phone_locale, phone_number, addresses FROM users";

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All users in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("{SELECT_USER} ORDER BY rowid"))
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    /// Whether a user row exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Project internal id and role for an identity-provider subject.
    ///
    /// This is the identity-resolution lookup; it deliberately reads
    /// nothing else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored role does not parse.
    pub async fn subject(&self, uid: &str) -> Result<Option<(UserId, Role)>, RepositoryError> {
        let row: Option<(UserId, String)> = sqlx::query_as("SELECT id, role FROM users WHERE uid = ?")
            .bind(uid)
            .fetch_optional(self.pool)
            .await?;
        match row {
            None => Ok(None),
            Some((id, role)) => {
                let role = role.parse().map_err(|e| corrupt("role", e))?;
                Ok(Some((id, role)))
            }
        }
    }

    /// Find the internal id registered for an exact `(uid, email)` pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn registration(
        &self,
        uid: &str,
        email: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let row: Option<(UserId,)> =
            sqlx::query_as("SELECT id FROM users WHERE uid = ? AND email = ?")
                .bind(uid)
                .bind(email)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `uid` or `email` already
    /// exists, `Database` for other failures.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, uid, email, role, name, surname, phone_locale, phone_number, addresses, revision, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.uid)
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(&user.name)
        .bind(&user.surname)
        .bind(user.phone_locale.map(|l| l.as_str()))
        .bind(&user.phone_number)
        .bind(to_json(&user.addresses)?)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "user"))?;
        Ok(())
    }

    /// Write back a user's profile fields. Addresses are untouched; they
    /// have their own mutation methods below.
    ///
    /// Returns false when the row no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the new email collides,
    /// `Database` for other failures.
    pub async fn update(&self, user: &User) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, role = ?, name = ?, surname = ?, phone_locale = ?, phone_number = ?, \
             revision = revision + 1, updated_at = ? WHERE id = ?",
        )
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(&user.name)
        .bind(&user.surname)
        .bind(user.phone_locale.map(|l| l.as_str()))
        .bind(&user.phone_number)
        .bind(Utc::now())
        .bind(user.id)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "user"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user row. Returns false when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The user's address sequence, or `None` when the user is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored JSON does not parse.
    pub async fn addresses(&self, id: UserId) -> Result<Option<Vec<Address>>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT addresses FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.map(|(json,)| serde_json::from_str(&json).map_err(|e| corrupt("addresses", e)))
            .transpose()
    }

    /// Append an address to the end of the sequence. Returns false when
    /// the user is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn push_address(
        &self,
        id: UserId,
        address: &Address,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET addresses = json_insert(addresses, '$[#]', json(?)), \
             revision = revision + 1, updated_at = ? WHERE id = ?",
        )
        .bind(to_json(address)?)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the element at a 0-based index, preserving order and
    /// length. Returns false when the user is absent or the index is past
    /// the end.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn replace_address_at(
        &self,
        id: UserId,
        index: usize,
        address: &Address,
    ) -> Result<bool, RepositoryError> {
        let index = i64::try_from(index).map_err(|e| corrupt("address index", e))?;
        let result = sqlx::query(
            "UPDATE users SET addresses = json_replace(addresses, ?, json(?)), \
             revision = revision + 1, updated_at = ? \
             WHERE id = ? AND json_array_length(addresses) > ?",
        )
        .bind(format!("$[{index}]"))
        .bind(to_json(address)?)
        .bind(Utc::now())
        .bind(id)
        .bind(index)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the element with the given stable id, preserving order and
    /// length. Returns false when the user or the element is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn replace_address_by_id(
        &self,
        id: UserId,
        address_id: AddressId,
        address: &Address,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET addresses = (\
               SELECT json_group_array(\
                        CASE WHEN json_extract(value, '$.id') = ?1 \
                             THEN json(?2) ELSE json(value) END) \
                 FROM json_each(users.addresses)), \
             revision = revision + 1, updated_at = ?3 \
             WHERE id = ?4 AND EXISTS (\
               SELECT 1 FROM json_each(users.addresses) \
                WHERE json_extract(value, '$.id') = ?1)",
        )
        .bind(address_id.to_string())
        .bind(to_json(address)?)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the element at a 0-based index in one atomic update; the
    /// remaining elements keep their order with no placeholder left
    /// behind. Returns false when the user is absent or the index is past
    /// the end.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove_address_at(&self, id: UserId, index: u64) -> Result<bool, RepositoryError> {
        let index = i64::try_from(index).map_err(|e| corrupt("address index", e))?;
        let result = sqlx::query(
            "UPDATE users SET addresses = json_remove(addresses, ?), \
             revision = revision + 1, updated_at = ? \
             WHERE id = ? AND json_array_length(addresses) > ?",
        )
        .bind(format!("$[{index}]"))
        .bind(Utc::now())
        .bind(id)
        .bind(index)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the element with the given stable id in one atomic update.
    /// Returns false when the user or the element is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove_address_by_id(
        &self,
        id: UserId,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET addresses = (\
               SELECT json_group_array(json(value)) FROM json_each(users.addresses) \
                WHERE json_extract(value, '$.id') <> ?1), \
             revision = revision + 1, updated_at = ?2 \
             WHERE id = ?3 AND EXISTS (\
               SELECT 1 FROM json_each(users.addresses) \
                WHERE json_extract(value, '$.id') = ?1)",
        )
        .bind(address_id.to_string())
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
