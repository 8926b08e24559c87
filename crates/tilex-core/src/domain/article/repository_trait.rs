//! Repository trait for article persistence
//!
//! This module defines the trait for article storage operations.
//! The trait abstracts over different storage backends (SQLite, etc.).

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::listing::ListingPlan;
use crate::error::Result;

use super::entity::{Article, ArticleStatus, ArticleUpdate, PreparedArticle};

/// Repository trait for article persistence
///
/// Errors from the backend are returned as-is; implementations do not retry.
#[async_trait]
pub trait ArticleRepositoryTrait: Send + Sync {
    /// Every article, oldest id first
    async fn select_all(&self) -> Result<Vec<Article>>;

    /// Look up one article
    async fn select_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// One page of articles matching the plan's filters, in the plan's order
    async fn select_by_filter(&self, plan: &ListingPlan) -> Result<Vec<Article>>;

    /// Number of articles matching the filters, ignoring pagination
    async fn count_by_filter(
        &self,
        title: Option<&str>,
        status: Option<ArticleStatus>,
    ) -> Result<u64>;

    /// Articles whose title or content contains `keyword`, case-insensitively
    async fn select_by_keyword(&self, keyword: &str) -> Result<Vec<Article>>;

    /// Insert an article and return it with its generated id
    async fn insert(&self, article: &PreparedArticle) -> Result<Article>;

    /// Apply a partial update; `None` if the article does not exist
    async fn update(
        &self,
        id: i64,
        changes: &ArticleUpdate,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Article>>;

    /// Delete an article; `false` if it did not exist
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Total number of articles
    async fn count(&self) -> Result<u64>;
}
