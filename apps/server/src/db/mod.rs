//! Listing storage backends

pub mod memory;
pub mod postgres;
pub mod query_builder;
pub mod traits;

pub use memory::InMemoryListingStore;
pub use postgres::PostgresListingStore;
pub use traits::ListingStore;
