//! Search domain module
//!
//! Keyword search support for articles: literal, case-insensitive matching,
//! highlighting and bounded snippet extraction.
//!
//! # Architecture
//!
//! - **Highlighter**: wraps keyword occurrences in display markers
//! - **SnippetExtractor**: cuts context windows around the first matches
//! - **Entities**: `SearchResult`
//!
//! # Example
//!
//! ```ignore
//! use tilex_core::domain::search::{SnippetExtractor, highlight};
//!
//! let snippets = SnippetExtractor::default().extract(&article.content, "spring");
//! let title = highlight(&article.title, "spring");
//! ```

pub mod entity;
pub mod highlight;
pub mod snippet;

/// Longest keyword accepted by a search request, in characters
pub const MAX_KEYWORD_LENGTH: usize = 100;

pub use entity::SearchResult;
pub use highlight::{
    DEFAULT_PATTERN_SIZE_LIMIT, HIGHLIGHT_PREFIX, HIGHLIGHT_SUFFIX, Highlighter, KeywordMatcher,
    highlight,
};
pub use snippet::{
    ELLIPSIS, FALLBACK_PREVIEW_LENGTH, MAX_SNIPPETS, SNIPPET_CONTEXT_LENGTH, SnippetExtractor,
    SnippetOptions, extract_snippets,
};
