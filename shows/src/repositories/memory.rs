use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{
    domains::{Show, ShowId},
    error::{Result, StorageError},
};

use super::ShowRepository;

/// Process-local [`ShowRepository`] with the same matching rules as the SQL
/// store. Ids start at 1 and are never handed out twice.
///
/// Name search lowercases with Unicode rules, which agrees with PostgreSQL
/// on a UTF-8 ctype but not on a `C` ctype database (ASCII folding only).
#[derive(Debug)]
pub struct InMemoryShowRepository {
    state: RwLock<State>,
}

#[derive(Debug)]
struct State {
    shows: BTreeMap<ShowId, Show>,
    // wider than ShowId so i32::MAX itself can still be assigned
    next_id: i64,
}

impl Default for InMemoryShowRepository {
    fn default() -> Self {
        Self {
            state: RwLock::new(State {
                shows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryShowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, predicate: impl Fn(&Show) -> bool) -> Vec<Show> {
        let state = self.state.read().await;
        state
            .shows
            .values()
            .filter(|&show| predicate(show))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl ShowRepository for InMemoryShowRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>> {
        let show = self.state.read().await.shows.get(&id).cloned();

        debug!(found = show.is_some(), "looked up show");
        Ok(show)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Show>> {
        let shows = self.filter(|_| true).await;

        debug!(count = shows.len(), "listed shows");
        Ok(shows)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Vec<Show>> {
        let needle = name.to_lowercase();
        let shows = self
            .filter(|show| show.name.to_lowercase().contains(&needle))
            .await;

        debug!(count = shows.len(), "searched shows by name");
        Ok(shows)
    }

    #[instrument(skip(self))]
    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Show>> {
        let shows = self.filter(|show| show.genre == genre).await;

        debug!(count = shows.len(), "searched shows by genre");
        Ok(shows)
    }

    #[instrument(skip(self, show), fields(show_id = ?show.id, name = %show.name))]
    async fn save(&self, show: &mut Show) -> Result<bool> {
        super::validate(show)?;

        let mut state = self.state.write().await;
        let Some(id) = show.id else {
            let raw = i32::try_from(state.next_id).map_err(|_| StorageError::IdsExhausted)?;
            let id = ShowId(raw);
            state.next_id += 1;

            show.id = Some(id);
            state.shows.insert(id, show.clone());

            debug!(%id, "inserted show");
            return Ok(true);
        };

        let Some(stored) = state.shows.get_mut(&id) else {
            debug!("update target missing");
            return Ok(false);
        };
        *stored = show.clone();

        debug!("updated show");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ShowId) -> Result<bool> {
        let deleted = self.state.write().await.shows.remove(&id).is_some();

        debug!(deleted, "deleted show");
        Ok(deleted)
    }
}
