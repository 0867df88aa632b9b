//! Order repository.
//!
//! Orders reference their owner and products by id only; nothing cascades
//! and stock is not checked or locked here.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use mercado_core::types::{OrderId, UserId};

use crate::models::Order;

use super::{RepositoryError, corrupt, to_json};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    shipping_address: String,
    shipping_cost: String,
    products: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            shipping_address: serde_json::from_str(&self.shipping_address)
                .map_err(|e| corrupt("shipping address", e))?,
            shipping_cost: Decimal::from_str(&self.shipping_cost)
                .map_err(|e| corrupt("shipping cost", e))?,
            products: serde_json::from_str(&self.products)
                .map_err(|e| corrupt("order lines", e))?,
            created_at: self.created_at,
        })
    }
}

const SELECT_ORDER: &str =
    "SELECT id, user_id, shipping_address, shipping_cost, products, created_at FROM orders";

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of orders, optionally restricted to one owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, owner: Option<UserId>) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = match owner {
            Some(user_id) => {
                sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = ?")
                    .bind(user_id)
                    .fetch_one(self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM orders")
                    .fetch_one(self.pool)
                    .await?
            }
        };
        Ok(count.unsigned_abs())
    }

    /// One page of orders in creation order, optionally restricted to one
    /// owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn page(
        &self,
        owner: Option<UserId>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let offset = i64::try_from(offset).map_err(|e| corrupt("page offset", e))?;
        let limit = i64::try_from(limit).map_err(|e| corrupt("page limit", e))?;

        let rows: Vec<OrderRow> = match owner {
            Some(user_id) => {
                sqlx::query_as(&format!(
                    "{SELECT_ORDER} WHERE user_id = ? ORDER BY created_at, rowid LIMIT ? OFFSET ?"
                ))
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "{SELECT_ORDER} ORDER BY created_at, rowid LIMIT ? OFFSET ?"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool)
                .await?
            }
        };
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// All of one user's orders in creation order. This is the user's
    /// embedded order sequence for positional addressing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE user_id = ? ORDER BY created_at, rowid"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.map(OrderRow::into_order).transpose()
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, shipping_address, shipping_cost, products, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(to_json(&order.shipping_address)?)
        .bind(order.shipping_cost.to_string())
        .bind(to_json(&order.products)?)
        .bind(order.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}
