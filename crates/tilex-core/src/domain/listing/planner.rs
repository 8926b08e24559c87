//! Listing query planning
//!
//! Validates pagination input and resolves the caller's sort and filter
//! choices into values that are safe to hand to the store.

use serde::Serialize;
use std::fmt;

use super::page::{MAX_PAGE_SIZE, PageRequest};
use crate::domain::article::ArticleStatus;
use crate::error::{Error, Result};

/// Columns a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
}

impl SortField {
    /// Resolve a client-supplied name; camelCase and snake_case are accepted
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "createdat" => Some(Self::CreatedAt),
            "updatedat" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Database column for ORDER BY
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// A validated listing query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPlan {
    pub page_num: u32,
    pub offset: u64,
    pub limit: u32,
    pub title: Option<String>,
    pub status: Option<ArticleStatus>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Turns a [`PageRequest`] into a [`ListingPlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFilterPlanner {
    max_page_size: u32,
}

impl Default for PageFilterPlanner {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE)
    }
}

impl PageFilterPlanner {
    pub fn new(max_page_size: u32) -> Self {
        Self { max_page_size }
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Validate pagination and resolve sort/filter inputs
    ///
    /// Out-of-range page numbers or sizes are rejected. Unknown sort fields
    /// fall back to `created_at`; unknown or missing sort orders to `DESC`.
    pub fn plan(&self, request: &PageRequest) -> Result<ListingPlan> {
        if request.page_num < 1 {
            return Err(Error::Validation(format!(
                "page_num must be at least 1, got {}",
                request.page_num
            )));
        }
        if request.page_size < 1 || request.page_size > self.max_page_size {
            return Err(Error::Validation(format!(
                "page_size must be between 1 and {}, got {}",
                self.max_page_size, request.page_size
            )));
        }

        let offset = u64::from(request.page_num - 1) * u64::from(request.page_size);

        let sort_field = match request.sort_field.as_deref() {
            Some(raw) => SortField::parse(raw).unwrap_or_else(|| {
                tracing::debug!(sort_field = raw, "Unrecognized sort field, using created_at");
                SortField::default()
            }),
            None => SortField::default(),
        };

        let sort_order = request
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        Ok(ListingPlan {
            page_num: request.page_num,
            offset,
            limit: request.page_size,
            title: request.title.clone(),
            status: request.status.map(|code| ArticleStatus::from_code(Some(code))),
            sort_field,
            sort_order,
        })
    }
}
