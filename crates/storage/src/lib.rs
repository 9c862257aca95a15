#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{CatalogRepository, InMemoryRepository, SessionStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
