use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use super::{ContentRepository, RepositoryError, Result, UserRepository};
use crate::models::{
    content::{ContentItem, Taxonomy},
    user::Role,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TaxonomyRow {
    category_ids: Vec<i64>,
    tag_ids: Vec<i64>,
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: i64,
    title: String,
    slug: String,
    published_at: DateTime<Utc>,
    category_ids: Vec<i64>,
    tag_ids: Vec<i64>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        ContentItem::new(row.id, row.title, row.slug, row.published_at)
            .with_categories(row.category_ids)
            .with_tags(row.tag_ids)
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ContentRepository for PgStore {
    #[instrument(skip(self))]
    async fn content_taxonomy(&self, item_id: i64) -> Result<Option<Taxonomy>> {
        let row = sqlx::query_as::<_, TaxonomyRow>(
            r#"
        SELECT
            ARRAY(SELECT category_id FROM post_categories WHERE post_id = p.id) AS category_ids,
            ARRAY(SELECT tag_id FROM post_tags WHERE post_id = p.id) AS tag_ids
        FROM posts p
        WHERE p.id = $1
        "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Taxonomy::new(row.category_ids, row.tag_ids)))
    }

    #[instrument(skip(self))]
    async fn find_candidates(
        &self,
        exclude_id: i64,
        category_ids: &BTreeSet<i64>,
        tag_ids: &BTreeSet<i64>,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        let category_ids: Vec<i64> = category_ids.iter().copied().collect();
        let tag_ids: Vec<i64> = tag_ids.iter().copied().collect();

        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
        SELECT
            p.id, p.title, p.slug, p.published_at,
            ARRAY(SELECT category_id FROM post_categories WHERE post_id = p.id) AS category_ids,
            ARRAY(SELECT tag_id FROM post_tags WHERE post_id = p.id) AS tag_ids
        FROM posts p
        WHERE p.status = 'published'
          AND p.published_at IS NOT NULL
          AND p.id <> $1
          AND (
            EXISTS (
                SELECT 1 FROM post_categories pc
                WHERE pc.post_id = p.id AND pc.category_id = ANY($2)
            )
            OR EXISTS (
                SELECT 1 FROM post_tags pt
                WHERE pt.post_id = p.id AND pt.tag_id = ANY($3)
            )
          )
        ORDER BY p.published_at DESC, p.id ASC
        LIMIT $4
        "#,
        )
        .bind(exclude_id)
        .bind(&category_ids)
        .bind(&tag_ids)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_recent_published(
        &self,
        exclude_id: i64,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
        SELECT
            p.id, p.title, p.slug, p.published_at,
            ARRAY(SELECT category_id FROM post_categories WHERE post_id = p.id) AS category_ids,
            ARRAY(SELECT tag_id FROM post_tags WHERE post_id = p.id) AS tag_ids
        FROM posts p
        WHERE p.status = 'published'
          AND p.published_at IS NOT NULL
          AND p.id <> $1
        ORDER BY p.published_at DESC, p.id ASC
        LIMIT $2
        "#,
        )
        .bind(exclude_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    #[instrument(skip(self))]
    async fn user_role(&self, user_id: i64) -> Result<Option<Role>> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match role {
            None => Ok(None),
            Some(name) => match name.parse::<Role>() {
                Ok(role) => Ok(Some(role)),
                Err(_) => {
                    tracing::warn!("User {user_id} has unrecognised role {name:?}");
                    Err(RepositoryError::CorruptRole(name))
                }
            },
        }
    }

    #[instrument(skip(self))]
    async fn set_user_role(&self, user_id: i64, role: Role) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(user_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
