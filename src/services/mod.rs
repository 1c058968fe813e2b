//! Service layer for the price board application.
//!
//! This module contains the pure business logic:
//! - Category classification (`CategoryClassifier`)
//! - Best-offer aggregation (`best_offers`)
//! - Listing filter/sort pipeline (`filter_and_sort`)

mod classify;
mod filter;
mod ranking;

pub use classify::CategoryClassifier;
pub use filter::{filter_and_sort, PriceFilter, SortOrder};
pub use ranking::best_offers;
