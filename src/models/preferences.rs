use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declared genre preferences for an account
///
/// Favorites drive the content-based recommendation tier; blocked genres are
/// excluded from recommendations entirely. Both lists hold genre names as the
/// guardian or child entered them; the catalog resolves them to genre ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct PreferenceSet {
    pub account_id: Uuid,
    pub favorite_genres: Vec<String>,
    pub blocked_genres: Vec<String>,
}

impl PreferenceSet {
    /// Creates an empty preference set for an account
    pub fn new(account_id: Uuid) -> Self {
        Self {
            account_id,
            favorite_genres: Vec::new(),
            blocked_genres: Vec::new(),
        }
    }

    pub fn has_favorites(&self) -> bool {
        !self.favorite_genres.is_empty()
    }

    /// Adds a favorite genre unless it is already listed or blocked
    pub fn add_favorite(&mut self, genre: impl Into<String>) {
        let genre = genre.into();
        if self.blocked_genres.contains(&genre) || self.favorite_genres.contains(&genre) {
            return;
        }
        self.favorite_genres.push(genre);
    }

    /// Blocks a genre, removing it from favorites if present
    pub fn add_blocked(&mut self, genre: impl Into<String>) {
        let genre = genre.into();
        self.favorite_genres.retain(|g| g != &genre);
        if !self.blocked_genres.contains(&genre) {
            self.blocked_genres.push(genre);
        }
    }
}
