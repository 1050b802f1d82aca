use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity token presented by a caller
///
/// Distinct from the internal account id; the account store resolves it.
/// Deliberately has no `Display` impl so the raw token cannot end up in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Internal account record, resolved once per recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    /// Internal account id
    pub id: Uuid,
    /// Age in years, used for age-rating filters
    pub age: i32,
}

/// Accumulated affinity between an account and a genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct GenreScore {
    pub genre_id: Uuid,
    pub score: i64,
}

/// A saved content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Bookmark {
    pub account_id: Uuid,
    pub content_id: Uuid,
    pub created_at: DateTime<Utc>,
}
