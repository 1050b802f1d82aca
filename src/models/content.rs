use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of recommendable content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "content_kind", rename_all = "snake_case")]
pub enum ContentKind {
    Book,
    Video,
}

/// Moderation state of a content item
///
/// Only `Approved` content is ever recommendable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "approval_status", rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A recommendable content item from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    /// Minimum reader age this item is rated for
    pub age_rating: i32,
    pub genre_ids: Vec<Uuid>,
    pub kind: ContentKind,
    pub approval_status: ApprovalStatus,
}

impl ContentItem {
    pub fn is_age_appropriate(&self, age: i32) -> bool {
        self.age_rating <= age
    }

    /// Whether any of this item's genres appear in the given set
    pub fn has_genre_in(&self, genres: &HashSet<Uuid>) -> bool {
        self.genre_ids.iter().any(|g| genres.contains(g))
    }
}

/// A catalog genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}
