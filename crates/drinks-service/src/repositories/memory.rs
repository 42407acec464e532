//! In-memory drinks repository for testing.
//!
//! Implements [`DrinkRepository`] over a mutex-guarded vector, enforcing the
//! same title uniqueness invariant as the real store. Exposed publicly so
//! integration tests can run the full HTTP stack without a database.

use crate::models::{Drink, Ingredient};
use crate::repositories::drinks::{DrinkRepository, StorageError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// In-memory drinks repository.
pub struct InMemoryDrinkRepository {
    /// Stored drinks, in insertion order.
    drinks: Mutex<Vec<Drink>>,
    /// Next id to assign.
    next_id: AtomicI64,
    /// Whether every operation should fail with a storage fault.
    fail: bool,
}

impl InMemoryDrinkRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            drinks: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail: false,
        }
    }

    /// Create a repository that fails every operation with a storage fault.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            drinks: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail: true,
        }
    }

    /// Number of stored drinks.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned, which only happens after a
    /// panic in another test thread.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn count(&self) -> usize {
        self.drinks.lock().unwrap().len()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<Drink>>, StorageError> {
        if self.fail {
            return Err(StorageError::Database("simulated storage fault".to_string()));
        }
        self.drinks
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }
}

impl Default for InMemoryDrinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DrinkRepository for InMemoryDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, StorageError> {
        Ok(self.guard()?.clone())
    }

    async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, StorageError> {
        let mut drinks = self.guard()?;

        if drinks.iter().any(|d| d.title == title) {
            return Err(StorageError::DuplicateTitle);
        }

        let drink = Drink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            recipe: recipe.to_vec(),
        };
        drinks.push(drink.clone());

        Ok(drink)
    }

    async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Drink, StorageError> {
        let mut drinks = self.guard()?;

        if let Some(new_title) = title {
            if drinks.iter().any(|d| d.title == new_title && d.id != id) {
                return Err(StorageError::DuplicateTitle);
            }
        }

        let drink = drinks
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StorageError::NotFound)?;

        if let Some(new_title) = title {
            drink.title = new_title.to_string();
        }
        if let Some(new_recipe) = recipe {
            drink.recipe = new_recipe.to_vec();
        }

        Ok(drink.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut drinks = self.guard()?;

        let before = drinks.len();
        drinks.retain(|d| d.id != id);

        if drinks.len() == before {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> bool {
        !self.fail
    }
}
