//! Snippet extraction
//!
//! Finds the first occurrences of a keyword in article content and cuts a
//! bounded context window around each one. Window arithmetic is done in
//! characters, so a window never splits a UTF-8 sequence.
//!
//! # Algorithm
//!
//! 1. Blank content or keyword yields no snippets.
//! 2. Matches are visited left to right; scanning stops after
//!    `max_snippets` windows.
//! 3. Each window spans `context_length` characters on both sides of the
//!    match, clamped to the content. An ellipsis marks each truncated side,
//!    and the assembled window, ellipses included, is then highlighted.
//! 4. When nothing matches, or the matcher cannot be built, a single
//!    unhighlighted preview of the first `fallback_length` characters is
//!    returned instead.
//!
//! Windows of nearby matches may overlap; they are kept as separate snippets.

use tokio_util::sync::CancellationToken;

use super::highlight::{
    DEFAULT_PATTERN_SIZE_LIMIT, HIGHLIGHT_PREFIX, HIGHLIGHT_SUFFIX, Highlighter, KeywordMatcher,
};
use crate::error::{Error, Result};

/// Characters of context kept on each side of a match
pub const SNIPPET_CONTEXT_LENGTH: usize = 60;

/// Maximum number of snippets produced per article
pub const MAX_SNIPPETS: usize = 5;

/// Length of the preview used when no match is windowed
pub const FALLBACK_PREVIEW_LENGTH: usize = 150;

/// Marker for a truncated window side
pub const ELLIPSIS: &str = "...";

/// Tuning for [`SnippetExtractor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOptions {
    pub context_length: usize,
    pub max_snippets: usize,
    pub fallback_length: usize,
    pub ellipsis: String,
    pub highlight_prefix: String,
    pub highlight_suffix: String,
    pub pattern_size_limit: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            context_length: SNIPPET_CONTEXT_LENGTH,
            max_snippets: MAX_SNIPPETS,
            fallback_length: FALLBACK_PREVIEW_LENGTH,
            ellipsis: ELLIPSIS.to_string(),
            highlight_prefix: HIGHLIGHT_PREFIX.to_string(),
            highlight_suffix: HIGHLIGHT_SUFFIX.to_string(),
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }
}

/// Extracts highlighted context windows around keyword occurrences
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    options: SnippetOptions,
    highlighter: Highlighter,
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        Self::new(SnippetOptions::default())
    }
}

impl SnippetExtractor {
    pub fn new(options: SnippetOptions) -> Self {
        let highlighter = Highlighter::new(
            options.highlight_prefix.clone(),
            options.highlight_suffix.clone(),
        )
        .with_size_limit(options.pattern_size_limit);
        Self {
            options,
            highlighter,
        }
    }

    pub fn options(&self) -> &SnippetOptions {
        &self.options
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Extract up to `max_snippets` highlighted windows
    pub fn extract(&self, content: &str, keyword: &str) -> Vec<String> {
        self.scan(content, keyword, None)
            .unwrap_or_else(|_| vec![self.fallback(content)])
    }

    /// Like [`extract`](Self::extract), but aborts with [`Error::Cancelled`]
    /// as soon as `token` is cancelled. No partial result is returned.
    pub fn extract_cancellable(
        &self,
        content: &str,
        keyword: &str,
        token: &CancellationToken,
    ) -> Result<Vec<String>> {
        self.scan(content, keyword, Some(token))
    }

    fn scan(
        &self,
        content: &str,
        keyword: &str,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<String>> {
        let cancelled = || token.is_some_and(|t| t.is_cancelled());

        if cancelled() {
            return Err(Error::Cancelled);
        }

        if content.trim().is_empty() || keyword.trim().is_empty() {
            return Ok(Vec::new());
        }

        let matcher = match KeywordMatcher::with_size_limit(keyword, self.options.pattern_size_limit)
        {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    keyword_len = keyword.len(),
                    "Snippet extraction failed, falling back to preview"
                );
                return Ok(vec![self.fallback(content)]);
            }
        };

        let mut snippets = Vec::with_capacity(self.options.max_snippets);
        for m in matcher.find_iter(content).take(self.options.max_snippets) {
            if cancelled() {
                return Err(Error::Cancelled);
            }
            snippets.push(self.window(content, m.start(), m.end(), &matcher));
        }

        if snippets.is_empty() {
            tracing::debug!("Keyword not found in content, using preview");
            snippets.push(self.fallback(content));
        }

        Ok(snippets)
    }

    /// Cut the window around the match at `start..end` (bytes), add ellipses
    /// on truncated sides, then highlight the assembled snippet
    fn window(&self, content: &str, start: usize, end: usize, matcher: &KeywordMatcher) -> String {
        let window_start = chars_before(content, start, self.options.context_length);
        let window_end = chars_after(content, end, self.options.context_length);

        let ellipsis = &self.options.ellipsis;
        let mut snippet = String::with_capacity(window_end - window_start + 2 * ellipsis.len());
        if window_start > 0 {
            snippet.push_str(ellipsis);
        }
        snippet.push_str(&content[window_start..window_end]);
        if window_end < content.len() {
            snippet.push_str(ellipsis);
        }

        self.highlighter.highlight_with(&snippet, matcher)
    }

    /// The first `fallback_length` characters, with an ellipsis if truncated
    fn fallback(&self, content: &str) -> String {
        let end = chars_after(content, 0, self.options.fallback_length);
        let mut preview = content[..end].to_string();
        if end < content.len() {
            preview.push_str(&self.options.ellipsis);
        }
        preview
    }
}

/// Extract snippets with the default options
pub fn extract_snippets(content: &str, keyword: &str) -> Vec<String> {
    SnippetExtractor::default().extract(content, keyword)
}

/// Byte offset `n` characters before `from`, clamped at 0
fn chars_before(text: &str, from: usize, n: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(from, |(i, _)| i)
}

/// Byte offset `n` characters after `from`, clamped at `text.len()`
fn chars_after(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}
