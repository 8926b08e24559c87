//! Result assembly
//!
//! Turns stored articles into the shapes handed back to callers: views with
//! the derived status label, search results with snippets, and page envelopes.

use tokio_util::sync::CancellationToken;

use super::entity::{Article, ArticleView};
use crate::domain::listing::PageResult;
use crate::domain::search::{SearchResult, SnippetExtractor};
use crate::error::Result;

/// Article with its derived status label
pub fn to_view(article: Article) -> ArticleView {
    ArticleView::from(article)
}

/// One search result per article, in store order
///
/// Title and content are copied untouched; only the snippets are highlighted.
pub fn assemble_search(
    articles: Vec<Article>,
    keyword: &str,
    extractor: &SnippetExtractor,
) -> Vec<SearchResult> {
    articles
        .into_iter()
        .map(|article| {
            let snippets = extractor.extract(&article.content, keyword);
            SearchResult::new(article.id, article.title, snippets, article.content)
        })
        .collect()
}

/// Like [`assemble_search`], stopping with `Error::Cancelled` once `token` fires
pub fn assemble_search_cancellable(
    articles: Vec<Article>,
    keyword: &str,
    extractor: &SnippetExtractor,
    token: &CancellationToken,
) -> Result<Vec<SearchResult>> {
    let mut results = Vec::with_capacity(articles.len());
    for article in articles {
        let snippets = extractor.extract_cancellable(&article.content, keyword, token)?;
        results.push(SearchResult::new(
            article.id,
            article.title,
            snippets,
            article.content,
        ));
    }
    Ok(results)
}

/// Wrap one page of articles in the pagination envelope
pub fn assemble_listing(
    articles: Vec<Article>,
    total: u64,
    page_num: u32,
    page_size: u32,
) -> PageResult<ArticleView> {
    PageResult::new(articles, total, page_num, page_size).map(to_view)
}
