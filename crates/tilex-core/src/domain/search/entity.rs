//! Search result types

use serde::{Deserialize, Serialize};

/// One article matched by a keyword search
///
/// `title` and `content` are copied from the article untouched; only the
/// snippets carry highlight markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub snippets: Vec<String>,
    pub content: String,
}

impl SearchResult {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        snippets: Vec<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            snippets,
            content: content.into(),
        }
    }
}
