//! Storage seam for listings

use crate::{models::ListingRecord, Result};
use async_trait::async_trait;
use nodepop_query::{Filter, Listing, QueryDescriptor};

/// Storage backend for listings.
///
/// Backends receive descriptors that are already validated and typed; they
/// only translate them. Implementations must be safe to share between
/// request tasks.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Listings matching `query`, sorted and paged as it says.
    ///
    /// Without a sort, results come back in insertion order. Projection is
    /// left to the caller.
    async fn search(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>>;

    /// Number of listings matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64>;

    /// Persist a listing and return it with its assigned id.
    async fn save(&self, listing: Listing) -> Result<ListingRecord>;

    /// Release held resources. Called once at shutdown.
    async fn close(&self) {}
}
