use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Account, ContentItem, IdentityToken, PreferenceSet},
    stores::{AccountStore, BookmarkStore, ContentCatalog, InteractionStore, PreferenceStore},
};

/// How many of the caller's highest-scored genres seed collaborative filtering
const TOP_GENRE_COUNT: usize = 5;
/// Result cap for the collaborative tier
const COLLABORATIVE_LIMIT: usize = 10;
/// Candidate pool cap for the content-based tier
const CONTENT_BASED_LIMIT: usize = 10;
/// Catalog pool size drawn for the default tier
const FALLBACK_POOL_SIZE: i64 = 15;
/// Result cap for the default tier
const FALLBACK_LIMIT: usize = 8;

/// Produces personalized book recommendations
///
/// Three strategies are tried in order, and the first one that yields a
/// non-empty result wins: collaborative filtering over similar readers'
/// bookmarks, content-based filtering over declared favorite genres, and a
/// default age-appropriate selection from the catalog. A strategy that fails
/// or produces nothing simply hands over to the next one; the resolver never
/// surfaces an error to the caller.
pub struct RecommendationService {
    accounts: Arc<dyn AccountStore>,
    interactions: Arc<dyn InteractionStore>,
    bookmarks: Arc<dyn BookmarkStore>,
    catalog: Arc<dyn ContentCatalog>,
    preferences: Arc<dyn PreferenceStore>,
}

impl RecommendationService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        interactions: Arc<dyn InteractionStore>,
        bookmarks: Arc<dyn BookmarkStore>,
        catalog: Arc<dyn ContentCatalog>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            accounts,
            interactions,
            bookmarks,
            catalog,
            preferences,
        }
    }

    /// Resolves book recommendations for the caller behind `token`
    ///
    /// An unknown identity or a failed account lookup yields an empty list,
    /// as does exhausting all three tiers.
    pub async fn recommend_books(&self, token: &IdentityToken) -> Vec<ContentItem> {
        let account = match self.accounts.account_for_identity(token).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::warn!("Identity token does not resolve to an account");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(error = %e, "Account lookup failed");
                return Vec::new();
            }
        };

        let preferences = match self.preferences.preference_set(account.id).await {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(error = %e, "Preference lookup failed");
                None
            }
        };
        let blocked = self.blocked_genre_ids(preferences.as_ref()).await;

        if let Some(items) = self
            .run_tier("collaborative", self.collaborative(&account, &blocked))
            .await
        {
            return items;
        }

        if let Some(items) = self
            .run_tier(
                "content_based",
                self.content_based(&account, preferences.as_ref(), &blocked),
            )
            .await
        {
            return items;
        }

        self.run_tier("fallback", self.fallback(&account, &blocked))
            .await
            .unwrap_or_default()
    }

    /// Runs one strategy, treating failure as "no candidates"
    async fn run_tier(
        &self,
        tier: &'static str,
        attempt: impl Future<Output = AppResult<Option<Vec<ContentItem>>>>,
    ) -> Option<Vec<ContentItem>> {
        match attempt.await {
            Ok(Some(items)) if !items.is_empty() => {
                tracing::info!(tier, count = items.len(), "Tier produced recommendations");
                Some(items)
            }
            Ok(_) => {
                tracing::debug!(tier, "Tier produced no candidates");
                None
            }
            Err(e) => {
                tracing::warn!(tier, error = %e, "Tier failed, falling through");
                None
            }
        }
    }

    /// Tier 1: bookmarks of readers with overlapping genre interests
    ///
    /// Attempted only when the caller has interaction history. Candidates are
    /// ranked by how many similar readers bookmarked them, must share a genre
    /// with the caller's top genres, and never include the caller's own
    /// bookmarks.
    async fn collaborative(
        &self,
        account: &Account,
        blocked: &HashSet<Uuid>,
    ) -> AppResult<Option<Vec<ContentItem>>> {
        let scores = self.interactions.genre_scores(account.id).await?;
        if scores.is_empty() {
            return Ok(None);
        }

        let top_genres: Vec<Uuid> = scores
            .iter()
            .take(TOP_GENRE_COUNT)
            .map(|s| s.genre_id)
            .collect();
        let top_set: HashSet<Uuid> = top_genres.iter().copied().collect();

        let peers = self
            .interactions
            .accounts_interested_in(&top_genres, account.id)
            .await?;
        if peers.is_empty() {
            return Ok(None);
        }

        let peer_bookmarks = self.bookmarks.bookmarks_for_accounts(&peers).await?;
        if peer_bookmarks.is_empty() {
            return Ok(None);
        }

        let own = self.bookmarks.bookmarked_ids(account.id).await?;

        // Bookmark frequency across peers, skipping what the caller already saved
        let mut frequency: HashMap<Uuid, usize> = HashMap::new();
        for bookmark in &peer_bookmarks {
            if !own.contains(&bookmark.content_id) {
                *frequency.entry(bookmark.content_id).or_insert(0) += 1;
            }
        }
        if frequency.is_empty() {
            return Ok(None);
        }

        let candidate_ids: Vec<Uuid> = frequency.keys().copied().collect();
        let items = self
            .catalog
            .approved_books_by_ids(&candidate_ids, account.age)
            .await?;

        let mut ranked: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| item.has_genre_in(&top_set))
            .filter(|item| !item.has_genre_in(blocked))
            .collect();
        // Most-bookmarked first; ties broken by content id to keep the order stable
        ranked.sort_by(|a, b| {
            frequency[&b.id]
                .cmp(&frequency[&a.id])
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked.truncate(COLLABORATIVE_LIMIT);

        Ok((!ranked.is_empty()).then_some(ranked))
    }

    /// Tier 2: catalog matches for the caller's declared favorite genres
    async fn content_based(
        &self,
        account: &Account,
        preferences: Option<&PreferenceSet>,
        blocked: &HashSet<Uuid>,
    ) -> AppResult<Option<Vec<ContentItem>>> {
        let Some(prefs) = preferences else {
            return Ok(None);
        };
        if !prefs.has_favorites() {
            return Ok(None);
        }

        // Names that resolve to no catalog genre are dropped here
        let genres = self.catalog.resolve_genres(&prefs.favorite_genres).await?;
        let favorite_ids: Vec<Uuid> = genres
            .iter()
            .map(|g| g.id)
            .filter(|id| !blocked.contains(id))
            .collect();
        if favorite_ids.is_empty() {
            return Ok(None);
        }

        let items = self
            .catalog
            .approved_books_in_genres(&favorite_ids, account.age)
            .await?;
        let own = self.bookmarks.bookmarked_ids(account.id).await?;

        let mut pool: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| !own.contains(&item.id))
            .filter(|item| !item.has_genre_in(blocked))
            .collect();
        pool.truncate(CONTENT_BASED_LIMIT);
        pool.shuffle(&mut rand::thread_rng());

        Ok((!pool.is_empty()).then_some(pool))
    }

    /// Tier 3: a shuffled age-appropriate selection from the whole catalog
    ///
    /// The default shelf does not exclude the caller's own bookmarks, unlike
    /// tiers 1 and 2.
    async fn fallback(
        &self,
        account: &Account,
        blocked: &HashSet<Uuid>,
    ) -> AppResult<Option<Vec<ContentItem>>> {
        let items = self
            .catalog
            .approved_books_for_age(account.age, FALLBACK_POOL_SIZE)
            .await?;

        let mut pool: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| !item.has_genre_in(blocked))
            .collect();
        pool.shuffle(&mut rand::thread_rng());
        pool.truncate(FALLBACK_LIMIT);

        Ok((!pool.is_empty()).then_some(pool))
    }

    /// Resolves the caller's blocked genre names to catalog ids
    ///
    /// A failed lookup logs and degrades to an empty set rather than aborting
    /// the request.
    async fn blocked_genre_ids(&self, preferences: Option<&PreferenceSet>) -> HashSet<Uuid> {
        let Some(prefs) = preferences else {
            return HashSet::new();
        };
        if prefs.blocked_genres.is_empty() {
            return HashSet::new();
        }

        match self.catalog.resolve_genres(&prefs.blocked_genres).await {
            Ok(genres) => genres.into_iter().map(|g| g.id).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Blocked-genre resolution failed");
                HashSet::new()
            }
        }
    }
}
