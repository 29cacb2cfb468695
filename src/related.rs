//! Related-content ranking.
//!
//! Candidates are scored by taxonomy overlap with the source item: every
//! shared category is worth [`CATEGORY_WEIGHT`], every shared tag
//! [`TAG_WEIGHT`]. Scores are raw weighted counts, never normalised by item
//! size. A source with no categories and no tags gets the most recently
//! published items instead.

use tracing::instrument;

use crate::{
    models::content::{ContentItem, Taxonomy},
    repository::{self, ContentRepository},
};

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 3;
pub const CATEGORY_WEIGHT: u32 = 2;
pub const TAG_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatednessScore {
    pub item: ContentItem,
    /// Zero for items returned by the recency fallback.
    pub score: u32,
}

pub struct RelatednessScorer<'a, R: ?Sized> {
    repo: &'a R,
    candidate_multiplier: usize,
}

impl<'a, R> RelatednessScorer<'a, R>
where
    R: ContentRepository + ?Sized,
{
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
        }
    }

    /// How many candidates to fetch per requested result. Clamped to at least 1.
    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.candidate_multiplier = multiplier.max(1);
        self
    }

    /// Up to `limit` items related to `source_id`, best first.
    ///
    /// An unknown `source_id` yields an empty list. Repository errors are
    /// returned as is.
    #[instrument(name = "related_content", skip(self))]
    pub async fn related(
        &self,
        source_id: i64,
        limit: usize,
    ) -> repository::Result<Vec<RelatednessScore>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let Some(taxonomy) = self.repo.content_taxonomy(source_id).await? else {
            tracing::debug!("Source item {source_id} not found, nothing is related");
            return Ok(Vec::new());
        };

        if taxonomy.is_empty() {
            let recent = self.repo.find_recent_published(source_id, limit).await?;
            return Ok(recent
                .into_iter()
                .filter(|item| item.id != source_id)
                .take(limit)
                .map(|item| RelatednessScore { item, score: 0 })
                .collect());
        }

        let pool_size = limit.saturating_mul(self.candidate_multiplier);
        let pool = self
            .repo
            .find_candidates(
                source_id,
                &taxonomy.category_ids,
                &taxonomy.tag_ids,
                pool_size,
            )
            .await?;

        tracing::debug!("Ranking {} candidates for item {source_id}", pool.len());

        Ok(rank(&taxonomy, source_id, pool, limit))
    }
}

pub fn score(source: &Taxonomy, candidate: &ContentItem) -> u32 {
    let shared_categories = candidate
        .taxonomy
        .category_ids
        .intersection(&source.category_ids)
        .count() as u32;
    let shared_tags = candidate
        .taxonomy
        .tag_ids
        .intersection(&source.tag_ids)
        .count() as u32;

    shared_categories * CATEGORY_WEIGHT + shared_tags * TAG_WEIGHT
}

/// Scores `pool`, drops the source and anything sharing nothing, then sorts
/// by score descending.
///
/// Equal scores are ordered newest first, then by ascending id, which is the
/// order the repository hands candidates over in.
pub fn rank(
    source: &Taxonomy,
    source_id: i64,
    pool: Vec<ContentItem>,
    limit: usize,
) -> Vec<RelatednessScore> {
    let mut scored: Vec<RelatednessScore> = pool
        .into_iter()
        .filter(|item| item.id != source_id)
        .map(|item| RelatednessScore {
            score: score(source, &item),
            item,
        })
        .filter(|scored| scored.score > 0)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.item.published_at.cmp(&a.item.published_at))
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    scored.truncate(limit);
    scored
}
