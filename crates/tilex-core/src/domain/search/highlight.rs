//! Keyword highlighting
//!
//! Wraps every case-insensitive occurrence of a literal keyword with a marker
//! pair, keeping the casing found in the text.

use regex::{Regex, RegexBuilder};

/// Default opening highlight marker
pub const HIGHLIGHT_PREFIX: &str = "<mark>";

/// Default closing highlight marker
pub const HIGHLIGHT_SUFFIX: &str = "</mark>";

/// Compiled size limit for a keyword matcher
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Case-insensitive matcher for a keyword taken as literal text
///
/// The keyword is escaped before compilation, so characters such as `.`, `*`
/// or `(` in user input only ever match themselves.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    /// Compile a matcher with the default size limit
    pub fn new(keyword: &str) -> Result<Self, regex::Error> {
        Self::with_size_limit(keyword, DEFAULT_PATTERN_SIZE_LIMIT)
    }

    /// Compile a matcher, failing if the compiled program exceeds `size_limit` bytes
    pub fn with_size_limit(keyword: &str, size_limit: usize) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()?;
        Ok(Self { regex })
    }

    /// Iterate non-overlapping matches, left to right
    pub fn find_iter<'r, 'h>(&'r self, text: &'h str) -> regex::Matches<'r, 'h> {
        self.regex.find_iter(text)
    }
}

/// Wraps keyword occurrences in a fixed marker pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    prefix: String,
    suffix: String,
    pattern_size_limit: usize,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HIGHLIGHT_PREFIX, HIGHLIGHT_SUFFIX)
    }
}

impl Highlighter {
    /// Create a highlighter with custom markers
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }

    /// Cap the compiled size of keyword matchers built by [`Self::highlight`]
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.pattern_size_limit = limit;
        self
    }

    pub fn pattern_size_limit(&self) -> usize {
        self.pattern_size_limit
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Highlight every occurrence of `keyword` in `text`
    ///
    /// Blank input on either side, or a keyword that cannot be compiled,
    /// returns `text` unchanged.
    pub fn highlight(&self, text: &str, keyword: &str) -> String {
        if text.trim().is_empty() || keyword.trim().is_empty() {
            return text.to_string();
        }

        match KeywordMatcher::with_size_limit(keyword, self.pattern_size_limit) {
            Ok(matcher) => self.highlight_with(text, &matcher),
            Err(e) => {
                tracing::warn!(error = %e, keyword_len = keyword.len(), "Keyword highlighting failed");
                text.to_string()
            }
        }
    }

    /// Highlight using an already compiled matcher
    pub fn highlight_with(&self, text: &str, matcher: &KeywordMatcher) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for m in matcher.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&self.prefix);
            out.push_str(m.as_str());
            out.push_str(&self.suffix);
            last = m.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

/// Highlight with the default `<mark>` markers
pub fn highlight(text: &str, keyword: &str) -> String {
    Highlighter::default().highlight(text, keyword)
}
