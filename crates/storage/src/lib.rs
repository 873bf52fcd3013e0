//! Storage layer for lessonhub
//!
//! Async domain traits with two implementations: `PgStorage` (sqlx over
//! PostgreSQL) for deployments and `MemoryStorage` for local runs and tests.
//! `StorageBackend` dispatches between them.

mod backend;
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod pg_migrations;
#[cfg(feature = "postgres")]
mod pg_storage;
pub mod traits;
mod types;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
#[cfg(feature = "postgres")]
pub use pg_storage::PgStorage;
pub use types::PaginatedResult;
