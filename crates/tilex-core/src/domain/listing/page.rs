//! Pagination request and page envelope

use serde::{Deserialize, Serialize};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page_num() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Listing parameters as received from a caller
///
/// Sort inputs are kept raw here; [`PageFilterPlanner`](super::PageFilterPlanner)
/// resolves them against the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page_num")]
    pub page_num: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_num: default_page_num(),
            page_size: default_page_size(),
            title: None,
            status: None,
            sort_field: None,
            sort_order: None,
        }
    }
}

impl PageRequest {
    /// Create a request for a given page
    pub fn new(page_num: u32, page_size: u32) -> Self {
        Self {
            page_num,
            page_size,
            ..Default::default()
        }
    }

    /// Filter on a title substring
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Filter on a status code
    pub fn with_status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    pub fn with_sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }
}

/// One page of records with pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub total: u64,
    pub page_num: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub records: Vec<T>,
}

impl<T> PageResult<T> {
    /// Build a page; `total_pages` derives from `total` and `page_size` only
    pub fn new(records: Vec<T>, total: u64, page_num: u32, page_size: u32) -> Self {
        Self {
            total,
            page_num,
            page_size,
            total_pages: total_pages(total, page_size),
            records,
        }
    }

    /// Transform the records, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            total: self.total,
            page_num: self.page_num,
            page_size: self.page_size,
            total_pages: self.total_pages,
            records: self.records.into_iter().map(f).collect(),
        }
    }

    /// Whether a page exists after this one
    pub fn has_next(&self) -> bool {
        u64::from(self.page_num) < self.total_pages
    }
}

/// `ceil(total / page_size)`, 0 when `page_size` is 0
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(u64::from(page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(100, 1), 100);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_total_pages_ignores_record_count() {
        let page = PageResult::new(vec![1, 2, 3], 25, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.len(), 3);
        assert!(!page.has_next());

        let first = PageResult::new(Vec::<i32>::new(), 25, 1, 10);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = PageResult::new(vec![1, 2], 12, 2, 2).map(|n| n * 10);
        assert_eq!(page.records, vec![10, 20]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 6);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page_num, 1);
        assert_eq!(request.page_size, 10);

        let request: PageRequest =
            serde_json::from_str(r#"{"pageNum":2,"sortField":"title","sortOrder":"asc"}"#).unwrap();
        assert_eq!(request.page_num, 2);
        assert_eq!(request.sort_field.as_deref(), Some("title"));
    }

    #[test]
    fn test_envelope_json_shape() {
        let json = serde_json::to_value(PageResult::new(vec!["a"], 25, 1, 10)).unwrap();
        assert_eq!(json["total"], 25);
        assert_eq!(json["pageNum"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["records"][0], "a");
    }
}
