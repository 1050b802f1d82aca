use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Account, Bookmark, ContentItem, Genre, GenreScore, IdentityToken, PreferenceSet},
};

use super::{AccountStore, BookmarkStore, ContentCatalog, InteractionStore, PreferenceStore};

/// Postgres-backed implementation of the five recommendation stores
///
/// One handle implements every store trait, so a single instance can be
/// shared across the resolver's seams.
pub struct PgStores {
    pool: PgPool,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStores {
    async fn account_for_identity(&self, token: &IdentityToken) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT a.id, a.age
            FROM accounts a
            JOIN account_identities i ON i.account_id = a.id
            WHERE i.token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

#[async_trait]
impl InteractionStore for PgStores {
    async fn genre_scores(&self, account_id: Uuid) -> AppResult<Vec<GenreScore>> {
        let scores = sqlx::query_as::<_, GenreScore>(
            r#"
            SELECT genre_id, score
            FROM interaction_scores
            WHERE account_id = $1
            ORDER BY score DESC, genre_id ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    async fn accounts_interested_in(
        &self,
        genre_ids: &[Uuid],
        exclude: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let accounts = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT account_id
            FROM interaction_scores
            WHERE genre_id = ANY($1) AND account_id <> $2
            "#,
        )
        .bind(genre_ids)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }
}

#[async_trait]
impl BookmarkStore for PgStores {
    async fn bookmarked_ids(&self, account_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT content_id FROM bookmarks WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn bookmarks_for_accounts(&self, account_ids: &[Uuid]) -> AppResult<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT account_id, content_id, created_at
            FROM bookmarks
            WHERE account_id = ANY($1)
            "#,
        )
        .bind(account_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookmarks)
    }
}

#[async_trait]
impl ContentCatalog for PgStores {
    async fn approved_books_by_ids(
        &self,
        content_ids: &[Uuid],
        max_age: i32,
    ) -> AppResult<Vec<ContentItem>> {
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT c.id, c.title, c.age_rating,
                   COALESCE(array_agg(g.genre_id) FILTER (WHERE g.genre_id IS NOT NULL), '{}'::uuid[]) AS genre_ids,
                   c.kind, c.approval_status
            FROM content c
            LEFT JOIN content_genres g ON g.content_id = c.id
            WHERE c.id = ANY($1)
              AND c.kind = 'book'
              AND c.approval_status = 'approved'
              AND c.age_rating <= $2
            GROUP BY c.id
            "#,
        )
        .bind(content_ids)
        .bind(max_age)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn approved_books_in_genres(
        &self,
        genre_ids: &[Uuid],
        max_age: i32,
    ) -> AppResult<Vec<ContentItem>> {
        // Genre membership is a single set query over the relation, not one
        // lookup per candidate item.
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT c.id, c.title, c.age_rating,
                   COALESCE(array_agg(g.genre_id) FILTER (WHERE g.genre_id IS NOT NULL), '{}'::uuid[]) AS genre_ids,
                   c.kind, c.approval_status
            FROM content c
            LEFT JOIN content_genres g ON g.content_id = c.id
            WHERE c.kind = 'book'
              AND c.approval_status = 'approved'
              AND c.age_rating <= $2
              AND EXISTS (
                  SELECT 1 FROM content_genres cg
                  WHERE cg.content_id = c.id AND cg.genre_id = ANY($1)
              )
            GROUP BY c.id
            "#,
        )
        .bind(genre_ids)
        .bind(max_age)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn approved_books_for_age(
        &self,
        max_age: i32,
        limit: i64,
    ) -> AppResult<Vec<ContentItem>> {
        // Row order is arbitrary but stable; the resolver shuffles the pool.
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT c.id, c.title, c.age_rating,
                   COALESCE(array_agg(g.genre_id) FILTER (WHERE g.genre_id IS NOT NULL), '{}'::uuid[]) AS genre_ids,
                   c.kind, c.approval_status
            FROM content c
            LEFT JOIN content_genres g ON g.content_id = c.id
            WHERE c.kind = 'book'
              AND c.approval_status = 'approved'
              AND c.age_rating <= $1
            GROUP BY c.id
            ORDER BY c.id
            LIMIT $2
            "#,
        )
        .bind(max_age)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn resolve_genres(&self, names: &[String]) -> AppResult<Vec<Genre>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

        let genres = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE LOWER(name) = ANY($1)",
        )
        .bind(&lowered)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }
}

#[async_trait]
impl PreferenceStore for PgStores {
    async fn preference_set(&self, account_id: Uuid) -> AppResult<Option<PreferenceSet>> {
        let prefs = sqlx::query_as::<_, PreferenceSet>(
            r#"
            SELECT account_id, favorite_genres, blocked_genres
            FROM preference_sets
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prefs)
    }
}
