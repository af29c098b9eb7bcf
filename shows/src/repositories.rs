pub mod memory;
pub mod sql;

use crate::{
    domains::{Show, ShowId},
    error::{Result, StorageError},
};

/// Persistence operations for [`Show`] records.
///
/// A missing record is never an error: lookups return `None` or an empty
/// list, writes return `false`.
#[async_trait::async_trait]
pub trait ShowRepository: Send + Sync {
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>>;

    /// Every stored show, ordered by id.
    async fn find_all(&self) -> Result<Vec<Show>>;

    /// Shows whose name contains `name`, ignoring case. Wildcard characters
    /// in `name` match themselves.
    ///
    /// Case folding beyond ASCII depends on the store: PostgreSQL follows the
    /// database ctype, the in-memory store always uses Unicode lowercase.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Show>>;

    /// Shows whose genre equals `genre` exactly, case included.
    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Show>>;

    /// Inserts `show` when it has no id, storing the assigned id back into
    /// it, otherwise updates the existing row. Returns whether exactly one
    /// row was written.
    async fn save(&self, show: &mut Show) -> Result<bool>;

    async fn delete_by_id(&self, id: ShowId) -> Result<bool>;
}

fn validate(show: &Show) -> Result<()> {
    show.validate().map_err(|err| StorageError::Invalid(err.to_string()))
}
