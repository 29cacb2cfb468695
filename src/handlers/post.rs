use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    related::{RelatednessScore, RelatednessScorer},
    startup::AppState,
};

#[derive(Debug, serde::Deserialize)]
pub struct RelatedQuery {
    limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct RelatedPostResponse {
    id: i64,
    title: String,
    slug: String,
    published_at: DateTime<Utc>,
    score: u32,
}

impl From<RelatednessScore> for RelatedPostResponse {
    fn from(scored: RelatednessScore) -> Self {
        let RelatednessScore { item, score } = scored;
        Self {
            id: item.id,
            title: item.title,
            slug: item.slug,
            published_at: item.published_at,
            score,
        }
    }
}

/// Related posts for the public post page.
///
/// A failing content store renders as "no related posts" rather than failing
/// the page.
#[instrument(skip(state))]
pub async fn related_posts(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Query(query): Query<RelatedQuery>,
) -> Json<Vec<RelatedPostResponse>> {
    let limit = query
        .limit
        .unwrap_or(state.related.default_limit)
        .min(state.related.max_limit);

    let scorer = RelatednessScorer::new(state.content.as_ref())
        .with_candidate_multiplier(state.related.candidate_multiplier);

    match scorer.related(post_id, limit).await {
        Ok(ranked) => Json(ranked.into_iter().map(RelatedPostResponse::from).collect()),
        Err(e) => {
            tracing::error!("Failed to rank related posts for post {post_id}: {e:#}");
            Json(Vec::new())
        }
    }
}
