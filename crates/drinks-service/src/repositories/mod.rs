//! Repository layer for the drinks service.
//!
//! Storage access sits behind the `DrinkRepository` trait so handlers stay
//! independent of the concrete store. `PgDrinkRepository` backs production;
//! `InMemoryDrinkRepository` backs integration tests.

pub mod drinks;
pub mod memory;

pub use drinks::{DrinkRepository, PgDrinkRepository, StorageError};
// In-memory repository for testing (exposed for integration tests)
#[allow(unused_imports)]
pub use memory::InMemoryDrinkRepository;
