//! Storage collaborators for the core.
//!
//! The permission engine and the relatedness scorer never talk to a database
//! directly. They go through these traits, implemented by [`PgStore`] for
//! production and [`MemoryStore`] for tests and database-less runs.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::models::{
    content::{ContentItem, Taxonomy},
    user::Role,
};

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored role {0:?} is not a known role")]
    CorruptRole(String),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = core::result::Result<T, RepositoryError>;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Category and tag ids of an item, or `None` if the item does not exist.
    async fn content_taxonomy(&self, item_id: i64) -> Result<Option<Taxonomy>>;

    /// Published items other than `exclude_id` sharing at least one of the
    /// given categories or tags, newest first, at most `limit` of them.
    async fn find_candidates(
        &self,
        exclude_id: i64,
        category_ids: &BTreeSet<i64>,
        tag_ids: &BTreeSet<i64>,
        limit: usize,
    ) -> Result<Vec<ContentItem>>;

    /// Published items other than `exclude_id`, newest first.
    async fn find_recent_published(&self, exclude_id: i64, limit: usize)
    -> Result<Vec<ContentItem>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn user_role(&self, user_id: i64) -> Result<Option<Role>>;

    /// Returns `false` when no such user exists.
    async fn set_user_role(&self, user_id: i64, role: Role) -> Result<bool>;
}
