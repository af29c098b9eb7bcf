//! Persistence for a TV show catalog.
//!
//! [`ShowRepository`] is the contract; [`SqlShowRepository`] stores shows in
//! PostgreSQL and [`InMemoryShowRepository`] keeps them in process.

pub mod config;
pub mod domains;
pub mod error;
pub mod repositories;

pub use config::DatabaseConfig;
pub use domains::{Show, ShowId};
pub use error::{Result, StorageError};
pub use repositories::{memory::InMemoryShowRepository, sql::SqlShowRepository, ShowRepository};
