//! PostgreSQL-backed [`ShowRepository`].
//!
//! Expects a `shows` table with the columns `show_id` (identity primary
//! key), `name`, `genre`, `description` and `premiere_date`. Creating it is
//! left to the deployment's migrations.

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, instrument};

use crate::{
    config::DatabaseConfig,
    domains::{Show, ShowId},
    error::{Result, StorageError},
};

use super::ShowRepository;

#[derive(Clone)]
pub struct SqlShowRepository {
    pub(super) pool: PgPool,
}

impl SqlShowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| StorageError::Configuration(err.to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(|err| match err {
                sqlx::Error::Configuration(err) => StorageError::Configuration(err.to_string()),
                err => err.into(),
            })?;

        debug!(max_connections = config.max_connections, "connected to show store");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ShowRepository for SqlShowRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>> {
        let show: Option<Show> = sqlx::query_as(
            "\
SELECT \
    show_id, \
    name, \
    genre, \
    description, \
    premiere_date \
 FROM shows \
WHERE show_id = $1\
",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(found = show.is_some(), "looked up show");
        Ok(show)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Show>> {
        let shows: Vec<Show> = sqlx::query_as(
            "\
SELECT \
    show_id, \
    name, \
    genre, \
    description, \
    premiere_date \
 FROM shows \
ORDER BY show_id\
",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = shows.len(), "listed shows");
        Ok(shows)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Vec<Show>> {
        let pattern = format!("%{}%", escape_like(name));

        let shows: Vec<Show> = sqlx::query_as(
            "\
SELECT \
    show_id, \
    name, \
    genre, \
    description, \
    premiere_date \
 FROM shows \
WHERE name ILIKE $1 \
ORDER BY show_id\
",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = shows.len(), "searched shows by name");
        Ok(shows)
    }

    #[instrument(skip(self))]
    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Show>> {
        let shows: Vec<Show> = sqlx::query_as(
            "\
SELECT \
    show_id, \
    name, \
    genre, \
    description, \
    premiere_date \
 FROM shows \
WHERE genre = $1 \
ORDER BY show_id\
",
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = shows.len(), "searched shows by genre");
        Ok(shows)
    }

    #[instrument(skip(self, show), fields(show_id = ?show.id, name = %show.name))]
    async fn save(&self, show: &mut Show) -> Result<bool> {
        super::validate(show)?;

        let Some(id) = show.id else {
            let (id,): (ShowId,) = sqlx::query_as(
                "\
INSERT INTO shows (name, genre, description, premiere_date) \
VALUES ($1, $2, $3, $4) \
RETURNING show_id\
",
            )
            .bind(&show.name)
            .bind(&show.genre)
            .bind(&show.description)
            .bind(show.premiere_date)
            .fetch_one(&self.pool)
            .await?;

            show.id = Some(id);
            debug!(%id, "inserted show");
            return Ok(true);
        };

        let rows = sqlx::query(
            "\
UPDATE shows SET \
    name = $2, \
    genre = $3, \
    description = $4, \
    premiere_date = $5 \
WHERE show_id = $1\
",
        )
        .bind(id)
        .bind(&show.name)
        .bind(&show.genre)
        .bind(&show.description)
        .bind(show.premiere_date)
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!(rows, "updated show");
        Ok(rows == 1)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: ShowId) -> Result<bool> {
        let rows = sqlx::query("DELETE FROM shows WHERE show_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        debug!(rows, "deleted show");
        Ok(rows == 1)
    }
}

/// Escapes `LIKE` wildcards so `term` only ever matches itself.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
