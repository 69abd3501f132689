//! Listing service - search, creation and tag counts
//!
//! Orchestrates each operation by:
//! - Validating the raw parameter bag
//! - Building the storage-agnostic query descriptor
//! - Delegating to the configured [`ListingStore`]

use crate::{db::ListingStore, models::ListingRecord, Result};
use futures::future::try_join_all;
use nodepop_query::{
    build_query, tag_count_plan, validate_new_listing, validate_query, Listing, ParamBag,
    Projection, Tag,
};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Matching listings and the projection they are rendered with.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub records: Vec<ListingRecord>,
    pub projection: Projection,
}

impl SearchResult {
    /// Each record as a JSON object carrying only the projected fields.
    pub fn to_json(&self) -> Vec<JsonValue> {
        self.records
            .iter()
            .map(|record| record.to_json(&self.projection))
            .collect()
    }
}

/// Listing count per tag, holding every tag of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCounts(pub BTreeMap<Tag, u64>);

impl TagCounts {
    pub fn get(&self, tag: Tag) -> u64 {
        self.0.get(&tag).copied().unwrap_or(0)
    }

    /// `{"lifestyle": n, "work": n, ...}` with every tag present.
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = Tag::ALL
            .iter()
            .map(|tag| (tag.as_str().to_string(), JsonValue::from(self.get(*tag))))
            .collect();
        JsonValue::Object(map)
    }
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Validate `bag` as a read request and run it.
    pub async fn search(&self, bag: &ParamBag) -> Result<SearchResult> {
        let params = validate_query(bag)?;
        let descriptor = build_query(&params);
        let records = self.store.search(&descriptor).await?;

        tracing::debug!(results = records.len(), "Listing search completed");
        Ok(SearchResult {
            records,
            projection: descriptor.projection,
        })
    }

    /// Validate `bag` as a new listing, enforce the entity rules and store it.
    pub async fn create(&self, bag: &ParamBag) -> Result<ListingRecord> {
        let new = validate_new_listing(bag)?;
        let listing = Listing::new(new)?;
        let record = self.store.save(listing).await?;

        tracing::info!(
            id = %record.id,
            title = record.listing.title(),
            "Listing created"
        );
        Ok(record)
    }

    /// Count listings per tag. One count query per tag, run concurrently.
    pub async fn tag_counts(&self) -> Result<TagCounts> {
        let counts = try_join_all(tag_count_plan().into_iter().map(|(tag, descriptor)| {
            let store = Arc::clone(&self.store);
            async move {
                let count = store.count(&descriptor.filter).await?;
                Ok::<_, crate::Error>((tag, count))
            }
        }))
        .await?;

        Ok(TagCounts(counts.into_iter().collect()))
    }
}
