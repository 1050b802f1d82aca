use axum::{extract::State, Extension, Json};

use crate::{middleware::identity::CallerIdentity, models::ContentItem, routes::AppState};

/// Handler for the book recommendations endpoint
///
/// An absent or unknown identity yields an empty list rather than an error
/// status; the reading shelf simply renders nothing.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Json<Vec<ContentItem>> {
    let Some(token) = identity.token() else {
        tracing::warn!("Recommendation request without identity token");
        return Json(Vec::new());
    };

    let items = state.recommendations.recommend_books(token).await;

    tracing::info!(count = items.len(), "Recommendations resolved");

    Json(items)
}
