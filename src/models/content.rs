use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

/// Publication state of a post or page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// Category and tag membership of a content item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    pub category_ids: BTreeSet<i64>,
    pub tag_ids: BTreeSet<i64>,
}

impl Taxonomy {
    pub fn new(
        category_ids: impl IntoIterator<Item = i64>,
        tag_ids: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            category_ids: category_ids.into_iter().collect(),
            tag_ids: tag_ids.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_ids.is_empty() && self.tag_ids.is_empty()
    }

    /// Whether `other` shares at least one category or tag with `self`.
    pub fn overlaps(&self, other: &Taxonomy) -> bool {
        !self.category_ids.is_disjoint(&other.category_ids)
            || !self.tag_ids.is_disjoint(&other.tag_ids)
    }
}

/// A published post or page as seen by the relatedness scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub taxonomy: Taxonomy,
    pub published_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        slug: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            taxonomy: Taxonomy::default(),
            published_at,
        }
    }

    pub fn with_categories(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.taxonomy.category_ids.extend(ids);
        self
    }

    pub fn with_tags(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.taxonomy.tag_ids.extend(ids);
        self
    }
}
