//! In-process listing storage

use super::ListingStore;
use crate::{models::ListingRecord, Result};
use async_trait::async_trait;
use nodepop_query::{Filter, Listing, QueryDescriptor};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Listings held in a vector, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    records: RwLock<Vec<ListingRecord>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn search(&self, query: &QueryDescriptor) -> Result<Vec<ListingRecord>> {
        let records = self.records.read().await;
        Ok(query
            .apply(records.as_slice(), |record| &record.listing)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter.matches(&record.listing))
            .count() as u64)
    }

    async fn save(&self, listing: Listing) -> Result<ListingRecord> {
        let record = ListingRecord::new(Uuid::new_v4(), listing);
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodepop_query::{build_query, ListingField, NewListing, QueryParameters, Tag};
    use rust_decimal::Decimal;

    fn listing(title: &str, price: i64, tag: &str) -> Listing {
        Listing::new(NewListing {
            title: title.to_string(),
            for_sale: true,
            price: Decimal::from(price),
            photo_reference: format!("{title}.jpg"),
            tags: [tag.to_string()].into_iter().collect(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn saved_listings_are_searchable_in_insertion_order() {
        let store = InMemoryListingStore::new();
        let first = store.save(listing("lamp", 10, "lifestyle")).await.unwrap();
        let second = store.save(listing("desk", 20, "work")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);

        let found = store.search(&QueryDescriptor::default()).await.unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[tokio::test]
    async fn count_uses_the_filter_only() {
        let store = InMemoryListingStore::new();
        for (title, tag) in [("a", "work"), ("b", "motor"), ("c", "work")] {
            store.save(listing(title, 1, tag)).await.unwrap();
        }
        let descriptor = build_query(&QueryParameters {
            tag: Some(Tag::Work),
            limit: Some(1),
            ..QueryParameters::default()
        });

        assert_eq!(store.search(&descriptor).await.unwrap().len(), 1);
        assert_eq!(store.count(&descriptor.filter).await.unwrap(), 2);
        assert!(descriptor.filter.get(ListingField::Tags).is_some());
    }
}
