//! Request-level operations over listing storage

pub mod listings;

pub use listings::{ListingService, SearchResult, TagCounts};
