//! Article repository for database operations
//!
//! SQLite implementation of [`ArticleRepositoryTrait`]. Dynamic queries are
//! assembled with `sqlx::QueryBuilder`; user values are always bound, and
//! only the static column names of [`SortField`](crate::domain::listing::SortField)
//! are written into ORDER BY.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::entity::{Article, ArticleStatus, ArticleUpdate, PreparedArticle};
use super::repository_trait::ArticleRepositoryTrait;
use crate::domain::listing::ListingPlan;
use crate::error::{Error, Result};

const SELECT_ARTICLES: &str =
    "SELECT id, title, content, status, created_at, updated_at FROM articles";

/// Repository for article database operations
#[derive(Debug, Clone)]
pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ArticleRepositoryTrait for SqliteArticleRepository {
    async fn select_all(&self) -> Result<Vec<Article>> {
        let rows: Vec<ArticleRow> = sqlx::query_as(&format!("{SELECT_ARTICLES} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Article>> {
        let row: Option<ArticleRow> = sqlx::query_as(&format!("{SELECT_ARTICLES} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(row.map(ArticleRow::into_article))
    }

    async fn select_by_filter(&self, plan: &ListingPlan) -> Result<Vec<Article>> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_ARTICLES);
        push_filters(&mut qb, plan.title.as_deref(), plan.status);

        let order = plan.sort_order.as_sql();
        qb.push(" ORDER BY ")
            .push(plan.sort_field.column())
            .push(" ")
            .push(order)
            .push(", id ")
            .push(order);
        qb.push(" LIMIT ")
            .push_bind(i64::from(plan.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(plan.offset).unwrap_or(i64::MAX));

        let rows: Vec<ArticleRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    async fn count_by_filter(
        &self,
        title: Option<&str>,
        status: Option<ArticleStatus>,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM articles");
        push_filters(&mut qb, title, status);

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(count.max(0) as u64)
    }

    async fn select_by_keyword(&self, keyword: &str) -> Result<Vec<Article>> {
        let pattern = like_pattern(keyword);

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            r"{SELECT_ARTICLES}
            WHERE title LIKE ? ESCAPE '\' OR content LIKE ? ESCAPE '\'
            ORDER BY id ASC"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    async fn insert(&self, article: &PreparedArticle) -> Result<Article> {
        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, content, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.status.code())
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(article.clone().into_article(result.last_insert_rowid()))
    }

    async fn update(
        &self,
        id: i64,
        changes: &ArticleUpdate,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Article>> {
        let mut tx = self.pool.begin().await.map_err(Error::DatabaseError)?;

        let row: Option<ArticleRow> = sqlx::query_as(&format!("{SELECT_ARTICLES} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::DatabaseError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut article = row.into_article();
        changes.apply(&mut article, updated_at);

        sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, content = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.status.code())
        .bind(article.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Error::DatabaseError)?;

        tx.commit().await.map_err(Error::DatabaseError)?;

        Ok(Some(article))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(count.max(0) as u64)
    }
}

/// Append WHERE conditions for the optional title and status filters
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, title: Option<&str>, status: Option<ArticleStatus>) {
    qb.push(" WHERE 1 = 1");

    if let Some(title) = title.filter(|t| !t.is_empty()) {
        qb.push(" AND title LIKE ")
            .push_bind(like_pattern(title))
            .push(r" ESCAPE '\'");
    }

    if let Some(status) = status {
        match status.code() {
            Some(code) => {
                qb.push(" AND status = ").push_bind(code);
            }
            None => {
                qb.push(" AND status IS NULL");
            }
        }
    }
}

/// `%text%` with LIKE wildcards in `text` escaped by `\`
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Internal row type for articles
#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    content: String,
    status: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl ArticleRow {
    fn into_article(self) -> Article {
        Article {
            id: self.id,
            title: self.title,
            content: self.content,
            status: ArticleStatus::from_code(self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::entity::{NewArticle, parse_timestamp};
    use crate::domain::listing::{PageFilterPlanner, PageRequest};
    use crate::storage::Database;

    async fn create_test_repo() -> SqliteArticleRepository {
        let db = Database::in_memory()
            .await
            .expect("Failed to create test database");
        SqliteArticleRepository::new(db.pool().clone())
    }

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    async fn seed(repo: &SqliteArticleRepository, title: &str, content: &str, created: &str) -> Article {
        let prepared = NewArticle::new(title, content)
            .with_created_at(ts(created))
            .prepare(ts("2025-01-01 00:00:00"));
        repo.insert(&prepared).await.unwrap()
    }

    fn plan(request: PageRequest) -> ListingPlan {
        PageFilterPlanner::default().plan(&request).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_select_by_id() {
        let repo = create_test_repo().await;

        let inserted = seed(&repo, "Hello", "World", "2025-03-01 10:00:00").await;
        assert!(inserted.id > 0);

        let fetched = repo.select_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched, inserted);
        assert_eq!(fetched.status, ArticleStatus::Published);
        assert_eq!(fetched.updated_at, ts("2025-03-01 10:00:00"));

        assert!(repo.select_by_id(inserted.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_all_in_id_order() {
        let repo = create_test_repo().await;
        let a = seed(&repo, "A", "first", "2025-03-02 00:00:00").await;
        let b = seed(&repo, "B", "second", "2025-03-01 00:00:00").await;

        let all = repo.select_all().await.unwrap();
        assert_eq!(all.iter().map(|x| x.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_filter_defaults_to_newest_first() {
        let repo = create_test_repo().await;
        seed(&repo, "Old", "x", "2025-01-01 00:00:00").await;
        seed(&repo, "New", "x", "2025-06-01 00:00:00").await;
        seed(&repo, "Mid", "x", "2025-03-01 00:00:00").await;

        let page = repo.select_by_filter(&plan(PageRequest::default())).await.unwrap();
        let titles: Vec<_> = page.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn test_filter_sort_by_title_ascending() {
        let repo = create_test_repo().await;
        seed(&repo, "Charlie", "x", "2025-01-01 00:00:00").await;
        seed(&repo, "Alpha", "x", "2025-01-02 00:00:00").await;
        seed(&repo, "Bravo", "x", "2025-01-03 00:00:00").await;

        let request = PageRequest::default()
            .with_sort_field("title")
            .with_sort_order("asc");
        let page = repo.select_by_filter(&plan(request)).await.unwrap();
        let titles: Vec<_> = page.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[tokio::test]
    async fn test_filter_pagination() {
        let repo = create_test_repo().await;
        for day in 1..=25 {
            seed(&repo, &format!("Post {day:02}"), "x", &format!("2025-01-{day:02} 00:00:00")).await;
        }

        let request = PageRequest::new(3, 10).with_sort_order("asc");
        let page = repo.select_by_filter(&plan(request)).await.unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].title, "Post 21");

        assert_eq!(repo.count_by_filter(None, None).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_title_filter_is_literal_substring() {
        let repo = create_test_repo().await;
        seed(&repo, "100% Rust", "x", "2025-01-01 00:00:00").await;
        seed(&repo, "1000 Rust tips", "x", "2025-01-02 00:00:00").await;
        seed(&repo, "snake_case names", "x", "2025-01-03 00:00:00").await;
        seed(&repo, "snakeXcase", "x", "2025-01-04 00:00:00").await;

        let request = PageRequest::default().with_title("0%");
        let page = repo.select_by_filter(&plan(request)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "100% Rust");
        assert_eq!(repo.count_by_filter(Some("0%"), None).await.unwrap(), 1);

        assert_eq!(repo.count_by_filter(Some("e_c"), None).await.unwrap(), 1);
        assert_eq!(repo.count_by_filter(Some("rust"), None).await.unwrap(), 2);
        assert_eq!(repo.count_by_filter(Some(""), None).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_status_filter() {
        let repo = create_test_repo().await;
        let draft = NewArticle::new("Draft", "x")
            .with_status(ArticleStatus::Draft)
            .prepare(ts("2025-01-01 00:00:00"));
        repo.insert(&draft).await.unwrap();
        seed(&repo, "Published", "x", "2025-01-02 00:00:00").await;
        let odd = NewArticle::new("Odd", "x")
            .with_status(ArticleStatus::Unknown(Some(7)))
            .prepare(ts("2025-01-03 00:00:00"));
        let odd = repo.insert(&odd).await.unwrap();

        let drafts = repo
            .select_by_filter(&plan(PageRequest::default().with_status(0)))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].status, ArticleStatus::Draft);

        assert_eq!(
            repo.count_by_filter(None, Some(ArticleStatus::Published)).await.unwrap(),
            1
        );
        assert_eq!(
            repo.select_by_id(odd.id).await.unwrap().unwrap().status,
            ArticleStatus::Unknown(Some(7))
        );
    }

    #[tokio::test]
    async fn test_select_by_keyword_is_case_insensitive() {
        let repo = create_test_repo().await;
        let a = seed(&repo, "Intro to Spring", "Boot basics", "2025-01-01 00:00:00").await;
        let b = seed(&repo, "Tokio", "We love SPRING too", "2025-01-02 00:00:00").await;
        seed(&repo, "Unrelated", "Nothing here", "2025-01-03 00:00:00").await;

        let found = repo.select_by_keyword("spring").await.unwrap();
        assert_eq!(found.iter().map(|x| x.id).collect::<Vec<_>>(), vec![a.id, b.id]);

        // Wildcards in the keyword are matched literally
        assert!(repo.select_by_keyword("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = create_test_repo().await;
        let article = seed(&repo, "Before", "Body", "2025-01-01 00:00:00").await;
        let later = ts("2025-02-02 02:02:02");

        let updated = repo
            .update(article.id, &ArticleUpdate::default().with_title("After"), later)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.content, "Body");
        assert_eq!(updated.updated_at, later);
        assert_eq!(repo.select_by_id(article.id).await.unwrap().unwrap(), updated);

        let missing = repo
            .update(9999, &ArticleUpdate::default().with_title("x"), later)
            .await
            .unwrap();
        assert!(missing.is_none());

        assert!(repo.delete_by_id(article.id).await.unwrap());
        assert!(!repo.delete_by_id(article.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\dir"), r"%c:\\dir%");
    }
}
