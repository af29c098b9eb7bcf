use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use time::Date;

pub const NAME_MAX_CHARS: usize = 255;
pub const GENRE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Store-assigned identifier of a persisted [`Show`].
///
/// Zero is never a valid identifier: [`ShowId::new`], deserialization and
/// database decoding all refuse it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct ShowId(pub(crate) i32);

#[derive(Debug, thiserror::Error)]
#[error("0 is reserved for shows that were never saved")]
pub struct ZeroShowId;

impl ShowId {
    pub fn new(raw: i32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ShowId {
    type Error = ZeroShowId;

    fn try_from(raw: i32) -> std::result::Result<Self, Self::Error> {
        Self::new(raw).ok_or(ZeroShowId)
    }
}

impl From<ShowId> for i32 {
    fn from(value: ShowId) -> Self {
        value.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl sqlx::Type<Postgres> for ShowId {
    fn type_info() -> PgTypeInfo {
        <i32 as sqlx::Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for ShowId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <i32 as Encode<Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Postgres> for ShowId {
    fn decode(value: PgValueRef<'r>) -> std::result::Result<Self, BoxDynError> {
        let raw = <i32 as Decode<Postgres>>::decode(value)?;
        Ok(Self::try_from(raw)?)
    }
}

/// Reads the legacy `showId: 0` "not saved yet" marker as `None`.
fn deserialize_show_id<'de, D>(deserializer: D) -> std::result::Result<Option<ShowId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i32>::deserialize(deserializer)?;
    Ok(raw.and_then(ShowId::new))
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// `None` until the show has been saved once.
    #[serde(rename = "showId", default, deserialize_with = "deserialize_show_id")]
    #[sqlx(rename = "show_id")]
    pub id: Option<ShowId>,
    pub name: String,
    pub genre: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub premiere_date: Option<Date>,
}

impl Show {
    pub fn new(name: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            genre: genre.into(),
            description: None,
            premiere_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_premiere_date(mut self, premiere_date: Date) -> Self {
        self.premiere_date = Some(premiere_date);
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.name.trim().is_empty(), "name must not be blank");
        anyhow::ensure!(
            self.name.chars().count() <= NAME_MAX_CHARS,
            "name must be at max {NAME_MAX_CHARS} chars wide"
        );
        anyhow::ensure!(
            self.genre.chars().count() <= GENRE_MAX_CHARS,
            "genre must be at max {GENRE_MAX_CHARS} chars wide"
        );

        let description_fits = self
            .description
            .as_ref()
            .map_or(true, |d| d.chars().count() <= DESCRIPTION_MAX_CHARS);
        anyhow::ensure!(
            description_fits,
            "description must be at max {DESCRIPTION_MAX_CHARS} chars wide"
        );

        Ok(())
    }
}
