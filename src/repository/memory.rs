use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ContentRepository, RepositoryError, Result, UserRepository};
use crate::models::{
    content::{ContentItem, PostStatus, Taxonomy},
    user::{Role, User},
};

/// In-process store, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<(ContentItem, PostStatus)>>,
    users: RwLock<HashMap<i64, User>>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_post(&self, item: ContentItem, status: PostStatus) {
        let mut posts = self.posts.write().await;
        posts.retain(|(existing, _)| existing.id != item.id);
        posts.push((item, status));
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Makes every subsequent call fail with [`RepositoryError::Unavailable`].
    pub async fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write().await = Some(reason.into());
    }

    async fn check_available(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(reason) => Err(RepositoryError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    async fn published_newest_first(
        &self,
        exclude_id: i64,
        keep: impl Fn(&ContentItem) -> bool,
        limit: usize,
    ) -> Vec<ContentItem> {
        let posts = self.posts.read().await;
        let mut found: Vec<ContentItem> = posts
            .iter()
            .filter(|(item, status)| {
                *status == PostStatus::Published && item.id != exclude_id && keep(item)
            })
            .map(|(item, _)| item.clone())
            .collect();

        found.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        found.truncate(limit);
        found
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn content_taxonomy(&self, item_id: i64) -> Result<Option<Taxonomy>> {
        self.check_available().await?;

        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|(item, _)| item.id == item_id)
            .map(|(item, _)| item.taxonomy.clone()))
    }

    async fn find_candidates(
        &self,
        exclude_id: i64,
        category_ids: &BTreeSet<i64>,
        tag_ids: &BTreeSet<i64>,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        self.check_available().await?;

        let wanted = Taxonomy {
            category_ids: category_ids.clone(),
            tag_ids: tag_ids.clone(),
        };
        Ok(self
            .published_newest_first(exclude_id, |item| item.taxonomy.overlaps(&wanted), limit)
            .await)
    }

    async fn find_recent_published(
        &self,
        exclude_id: i64,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        self.check_available().await?;

        Ok(self
            .published_newest_first(exclude_id, |_| true, limit)
            .await)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn user_role(&self, user_id: i64) -> Result<Option<Role>> {
        self.check_available().await?;

        Ok(self.users.read().await.get(&user_id).map(|user| user.role))
    }

    async fn set_user_role(&self, user_id: i64, role: Role) -> Result<bool> {
        self.check_available().await?;

        match self.users.write().await.get_mut(&user_id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
