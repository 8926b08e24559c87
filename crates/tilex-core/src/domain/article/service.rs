//! Article service
//!
//! Orchestrates listing, lookup, editing and keyword search on top of an
//! [`ArticleRepositoryTrait`] implementation.

use chrono::{Local, NaiveDateTime, SubsecRound};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::assembler;
use super::entity::{ArticleUpdate, ArticleView, NewArticle};
use super::repository::SqliteArticleRepository;
use super::repository_trait::ArticleRepositoryTrait;
use crate::config::Config;
use crate::domain::listing::{PageFilterPlanner, PageRequest, PageResult};
use crate::domain::search::{MAX_KEYWORD_LENGTH, SearchResult, SnippetExtractor};
use crate::error::{Error, Result};

/// Service for article operations
#[derive(Clone)]
pub struct ArticleService {
    repository: Arc<dyn ArticleRepositoryTrait>,
    planner: PageFilterPlanner,
    extractor: SnippetExtractor,
    max_keyword_length: usize,
}

impl std::fmt::Debug for ArticleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleService")
            .field("planner", &self.planner)
            .field("extractor", &self.extractor)
            .field("max_keyword_length", &self.max_keyword_length)
            .finish_non_exhaustive()
    }
}

impl ArticleService {
    /// Create a service with default planning and snippet settings
    pub fn new(repository: Arc<dyn ArticleRepositoryTrait>) -> Self {
        Self {
            repository,
            planner: PageFilterPlanner::default(),
            extractor: SnippetExtractor::default(),
            max_keyword_length: MAX_KEYWORD_LENGTH,
        }
    }

    /// Create a service using the limits and markers from `config`
    pub fn from_config(repository: Arc<dyn ArticleRepositoryTrait>, config: &Config) -> Self {
        Self {
            repository,
            planner: PageFilterPlanner::new(config.listing.max_page_size),
            extractor: SnippetExtractor::new(config.search.snippet_options()),
            max_keyword_length: config.search.max_keyword_length,
        }
    }

    /// Create a service backed by SQLite
    pub fn with_sqlite(pool: SqlitePool) -> Self {
        Self::new(Arc::new(SqliteArticleRepository::new(pool)))
    }

    pub fn with_extractor(mut self, extractor: SnippetExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_planner(mut self, planner: PageFilterPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Get the underlying repository
    pub fn repository(&self) -> &Arc<dyn ArticleRepositoryTrait> {
        &self.repository
    }

    /// Every article, oldest id first
    pub async fn list_all(&self) -> Result<Vec<ArticleView>> {
        tracing::info!("Listing all articles");

        let articles = self.repository.select_all().await?;

        tracing::info!(count = articles.len(), "Listed all articles");
        Ok(articles.into_iter().map(assembler::to_view).collect())
    }

    /// One page of articles
    pub async fn list_page(&self, request: &PageRequest) -> Result<PageResult<ArticleView>> {
        tracing::info!(
            page_num = request.page_num,
            page_size = request.page_size,
            title = request.title.as_deref(),
            status = request.status,
            "Listing articles page"
        );

        let plan = self.planner.plan(request)?;
        tracing::debug!(
            offset = plan.offset,
            limit = plan.limit,
            sort_field = %plan.sort_field,
            sort_order = %plan.sort_order,
            "Planned listing query"
        );

        let articles = self.repository.select_by_filter(&plan).await?;
        let total = self
            .repository
            .count_by_filter(plan.title.as_deref(), plan.status)
            .await?;

        let page = assembler::assemble_listing(articles, total, plan.page_num, plan.limit);
        tracing::info!(
            total = page.total,
            total_pages = page.total_pages,
            returned = page.records.len(),
            "Listed articles page"
        );
        Ok(page)
    }

    /// Look up one article
    pub async fn get_by_id(&self, id: i64) -> Result<ArticleView> {
        tracing::info!(id, "Fetching article");

        match self.repository.select_by_id(id).await? {
            Some(article) => Ok(assembler::to_view(article)),
            None => {
                tracing::info!(id, "Article not found");
                Err(Error::ArticleNotFound(id))
            }
        }
    }

    /// Validate, apply defaults and insert a new article
    pub async fn create(&self, article: NewArticle) -> Result<ArticleView> {
        tracing::info!(title = %article.title, "Creating article");

        article.validate()?;
        let prepared = article.prepare(now());
        let created = self.repository.insert(&prepared).await?;

        tracing::info!(id = created.id, "Created article");
        Ok(assembler::to_view(created))
    }

    /// Apply a partial update to an existing article
    pub async fn update(&self, id: i64, changes: ArticleUpdate) -> Result<ArticleView> {
        tracing::info!(id, "Updating article");

        changes.validate()?;
        let updated = self
            .repository
            .update(id, &changes, now())
            .await?
            .ok_or(Error::ArticleNotFound(id))?;

        tracing::info!(id, "Updated article");
        Ok(assembler::to_view(updated))
    }

    /// Delete an article
    pub async fn delete(&self, id: i64) -> Result<()> {
        tracing::info!(id, "Deleting article");

        if !self.repository.delete_by_id(id).await? {
            return Err(Error::ArticleNotFound(id));
        }

        tracing::info!(id, "Deleted article");
        Ok(())
    }

    /// Keyword search over titles and contents
    ///
    /// A blank keyword yields no results without touching the store.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        if !self.check_keyword(keyword)? {
            return Ok(Vec::new());
        }

        tracing::info!(keyword, "Searching articles");

        let articles = self.repository.select_by_keyword(keyword).await?;
        let results = assembler::assemble_search(articles, keyword, &self.extractor);

        tracing::info!(keyword, count = results.len(), "Search complete");
        Ok(results)
    }

    /// Like [`search`](Self::search), aborting with [`Error::Cancelled`] once
    /// `token` is cancelled, whether during the store call or the scan
    pub async fn search_cancellable(
        &self,
        keyword: &str,
        token: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        if !self.check_keyword(keyword)? {
            return Ok(Vec::new());
        }

        tracing::info!(keyword, "Searching articles");

        let articles = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::info!(keyword, "Search cancelled");
                return Err(Error::Cancelled);
            }
            articles = self.repository.select_by_keyword(keyword) => articles?,
        };

        let results =
            assembler::assemble_search_cancellable(articles, keyword, &self.extractor, token)
                .inspect_err(|e| {
                    if matches!(e, Error::Cancelled) {
                        tracing::info!(keyword, "Search cancelled");
                    }
                })?;

        tracing::info!(keyword, count = results.len(), "Search complete");
        Ok(results)
    }

    /// `Ok(false)` for a blank keyword, an error for an overlong one
    fn check_keyword(&self, keyword: &str) -> Result<bool> {
        if keyword.trim().is_empty() {
            tracing::warn!("Blank search keyword, returning no results");
            return Ok(false);
        }

        let length = keyword.chars().count();
        if length > self.max_keyword_length {
            return Err(Error::Validation(format!(
                "Keyword must be at most {} characters, got {}",
                self.max_keyword_length, length
            )));
        }

        Ok(true)
    }
}

/// Local time with whole seconds, matching the stored precision
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
