//! Domain layer
//!
//! Contains the core business logic and domain models.

pub mod article;
pub mod listing;
pub mod search;
