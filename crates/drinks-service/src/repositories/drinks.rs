//! Drinks repository for database operations.
//!
//! Provides CRUD over the drinks table behind the [`DrinkRepository`] trait.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - The title uniqueness invariant is enforced by the UNIQUE constraint and
//!   surfaced as a typed conflict, not checked-then-inserted

use crate::models::{Drink, Ingredient};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::instrument;

/// Typed storage failure.
///
/// Distinguishes the faults callers react to differently: a missing row, a
/// violated uniqueness constraint, and everything else the store can throw.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No drink with the requested id.
    #[error("drink not found")]
    NotFound,

    /// A drink with this title already exists.
    #[error("a drink with this title already exists")]
    DuplicateTitle,

    /// Any other storage fault (I/O, connection, corrupt row).
    #[error("database error: {0}")]
    Database(String),
}

/// Storage interface for drinks.
///
/// The service depends only on this trait; the concrete store is injected
/// at construction time.
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// List all drinks, ordered by id.
    async fn list(&self) -> Result<Vec<Drink>, StorageError>;

    /// Insert a new drink.
    ///
    /// Fails with `DuplicateTitle` if the title is already taken.
    async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, StorageError>;

    /// Partially update a drink. `None` fields keep their current value.
    ///
    /// Fails with `NotFound` if the id is unknown and `DuplicateTitle` if
    /// the new title is already taken.
    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Drink, StorageError>;

    /// Delete a drink.
    ///
    /// Fails with `NotFound` if the id is unknown.
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// Whether the store is reachable.
    async fn ping(&self) -> bool;
}

/// PostgreSQL-backed drinks repository.
pub struct PgDrinkRepository {
    pool: PgPool,
}

impl PgDrinkRepository {
    /// Create a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrinkRepository for PgDrinkRepository {
    #[instrument(skip_all, name = "drinks.repo.list")]
    async fn list(&self) -> Result<Vec<Drink>, StorageError> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(row_to_drink).collect()
    }

    #[instrument(skip_all, name = "drinks.repo.insert")]
    async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, StorageError> {
        let recipe_text = serialize_recipe(recipe)?;

        let row = sqlx::query(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(&recipe_text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        row_to_drink(row)
    }

    #[instrument(skip_all, name = "drinks.repo.update", fields(id = %id))]
    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Drink, StorageError> {
        let recipe_text = recipe.map(serialize_recipe).transpose()?;

        let row = sqlx::query(
            r#"
            UPDATE drinks
            SET title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe_text.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map_or(Err(StorageError::NotFound), row_to_drink)
    }

    #[instrument(skip_all, name = "drinks.repo.delete", fields(id = %id))]
    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    #[instrument(skip_all, name = "drinks.repo.ping")]
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

/// Map a sqlx error to a typed storage error.
fn map_db_error(error: sqlx::Error) -> StorageError {
    match &error {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StorageError::DuplicateTitle
        }
        _ => StorageError::Database(error.to_string()),
    }
}

/// Serialize a recipe to the JSON text stored in the recipe column.
fn serialize_recipe(recipe: &[Ingredient]) -> Result<String, StorageError> {
    serde_json::to_string(recipe).map_err(|e| StorageError::Database(e.to_string()))
}

/// Map a database row to a Drink, parsing the serialized recipe.
fn row_to_drink(row: sqlx::postgres::PgRow) -> Result<Drink, StorageError> {
    let recipe_text: String = row.get("recipe");
    let recipe: Vec<Ingredient> = serde_json::from_str(&recipe_text).map_err(|e| {
        StorageError::Database(format!("stored recipe is not valid JSON: {e}"))
    })?;

    Ok(Drink {
        id: row.get("id"),
        title: row.get("title"),
        recipe,
    })
}
