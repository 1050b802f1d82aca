//! Store abstractions for the recommendation resolver
//!
//! Each trait covers one external collaborator: accounts, interactions,
//! bookmarks, the content catalog, and declared preferences. The resolver
//! only ever reads through these seams, which keeps it testable against
//! mocks and independent of the backing database.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Account, Bookmark, ContentItem, Genre, GenreScore, IdentityToken, PreferenceSet},
};

pub mod postgres;

/// Resolves caller identities to internal accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Looks up the account behind an opaque identity token
    async fn account_for_identity(&self, token: &IdentityToken) -> AppResult<Option<Account>>;
}

/// Per-account per-genre engagement scores
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// All genre scores for an account, highest score first
    ///
    /// Equal scores are ordered by ascending genre id so repeated calls see
    /// the same ranking.
    async fn genre_scores(&self, account_id: Uuid) -> AppResult<Vec<GenreScore>>;

    /// Accounts with at least one interaction in any of the given genres,
    /// excluding the requesting account
    async fn accounts_interested_in(
        &self,
        genre_ids: &[Uuid],
        exclude: Uuid,
    ) -> AppResult<Vec<Uuid>>;
}

/// Saved content per account
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Content ids the account has bookmarked
    async fn bookmarked_ids(&self, account_id: Uuid) -> AppResult<HashSet<Uuid>>;

    /// All bookmarks belonging to the given accounts
    async fn bookmarks_for_accounts(&self, account_ids: &[Uuid]) -> AppResult<Vec<Bookmark>>;
}

/// Content metadata and genre resolution
///
/// Every content query is already restricted to approved, book-kind items
/// within the caller's age rating; genre membership is checked as a single
/// set query rather than per item.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Approved book content from the given id set, restricted to the age limit
    async fn approved_books_by_ids(
        &self,
        content_ids: &[Uuid],
        max_age: i32,
    ) -> AppResult<Vec<ContentItem>>;

    /// Approved, age-appropriate book content tagged with any of the genres
    async fn approved_books_in_genres(
        &self,
        genre_ids: &[Uuid],
        max_age: i32,
    ) -> AppResult<Vec<ContentItem>>;

    /// Approved, age-appropriate book content, up to `limit` rows
    async fn approved_books_for_age(&self, max_age: i32, limit: i64)
        -> AppResult<Vec<ContentItem>>;

    /// Resolves genre names to catalog genres; unknown names are dropped
    async fn resolve_genres(&self, names: &[String]) -> AppResult<Vec<Genre>>;
}

/// Declared favorite/blocked genre lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// The preference set an account has declared, if any
    async fn preference_set(&self, account_id: Uuid) -> AppResult<Option<PreferenceSet>>;
}
