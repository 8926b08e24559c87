//! Listing domain
//!
//! Pagination input, the page envelope, and the planner that turns a raw
//! [`PageRequest`] into a store-safe [`ListingPlan`].

pub mod page;
pub mod planner;

pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageResult, total_pages};
pub use planner::{ListingPlan, PageFilterPlanner, SortField, SortOrder};
