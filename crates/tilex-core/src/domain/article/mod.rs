//! Article domain module
//!
//! Blog articles: storage, listing, editing and keyword search.
//!
//! # Architecture
//!
//! - **Entities**: `Article`, `NewArticle`, `ArticleUpdate`, `ArticleView`, `ArticleStatus`
//! - **Repository**: `ArticleRepositoryTrait`, implemented for SQLite by `SqliteArticleRepository`
//! - **Assembler**: builds views, search results and page envelopes
//! - **Service**: `ArticleService` orchestrating planner, store and assembler
//!
//! # Example
//!
//! ```ignore
//! use tilex_core::domain::article::ArticleService;
//! use tilex_core::domain::listing::PageRequest;
//!
//! let service = ArticleService::with_sqlite(pool.clone());
//!
//! let page = service.list_page(&PageRequest::new(1, 10).with_title("rust")).await?;
//! let results = service.search("spring").await?;
//! ```

pub mod assembler;
pub mod entity;
pub mod repository;
pub mod repository_trait;
pub mod service;

pub use assembler::{
    assemble_listing, assemble_search, assemble_search_cancellable, to_view,
};
pub use entity::{
    Article, ArticleStatus, ArticleUpdate, ArticleView, NewArticle, PreparedArticle,
    TIMESTAMP_FORMAT, parse_timestamp,
};
pub use repository::SqliteArticleRepository;
pub use repository_trait::ArticleRepositoryTrait;
pub use service::ArticleService;
