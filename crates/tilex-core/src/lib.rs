//! Tilex Core Library
//!
//! This crate provides the core functionality for the Tilex blog backend:
//! - Articles (create, list, update, delete)
//! - Paginated, filtered and sorted listings
//! - Keyword search with highlighted snippets
//! - Storage (SQLite with versioned migrations)
//! - Configuration

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::article::{
        Article, ArticleService, ArticleStatus, ArticleUpdate, ArticleView, NewArticle,
    };
    pub use crate::domain::listing::{PageRequest, PageResult};
    pub use crate::domain::search::SearchResult;
    pub use crate::error::{Error, Result};
    pub use crate::storage::{Database, DatabaseConfig};
}
