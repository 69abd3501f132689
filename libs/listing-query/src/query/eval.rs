//! In-memory evaluation of descriptors

use super::{Criterion, Filter, Projection, QueryDescriptor, Scalar};
use crate::listing::{Listing, ListingField};
use crate::params::{Direction, SortSpec};
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;

impl Criterion {
    /// Whether `listing`'s `field` satisfies this criterion. A criterion that
    /// does not fit the field's type never matches.
    pub fn matches(&self, field: ListingField, listing: &Listing) -> bool {
        match (self, field) {
            (Self::Equals(Scalar::Bool(b)), ListingField::ForSale) => listing.for_sale() == *b,
            (Self::Equals(Scalar::Number(n)), ListingField::Price) => listing.price() == *n,
            (Self::Equals(Scalar::Text(t)), ListingField::Title) => listing.title() == t.as_str(),
            (Self::Equals(Scalar::Text(t)), ListingField::PhotoReference) => {
                listing.photo_reference() == t.as_str()
            }
            (Self::ContainsIgnoreCase(fragment), ListingField::Title) => {
                contains_ignore_case(listing.title(), fragment)
            }
            (Self::ContainsIgnoreCase(fragment), ListingField::PhotoReference) => {
                contains_ignore_case(listing.photo_reference(), fragment)
            }
            (Self::Range { min, max }, ListingField::Price) => {
                let price = listing.price();
                min.map_or(true, |min| price >= min) && max.map_or(true, |max| price <= max)
            }
            (Self::Includes(tag), ListingField::Tags) => listing.has_tag(*tag),
            _ => false,
        }
    }
}

fn contains_ignore_case(haystack: &str, fragment: &str) -> bool {
    haystack.to_lowercase().contains(&fragment.to_lowercase())
}

impl Filter {
    pub fn matches(&self, listing: &Listing) -> bool {
        self.iter()
            .all(|(field, criterion)| criterion.matches(field, listing))
    }
}

impl SortSpec {
    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = match self.field.listing_field() {
            ListingField::Title => a.title().cmp(b.title()),
            ListingField::Price => a.price().cmp(&b.price()),
            ListingField::ForSale => a.for_sale().cmp(&b.for_sale()),
            ListingField::PhotoReference => a.photo_reference().cmp(b.photo_reference()),
            ListingField::Tags => a.tags().cmp(b.tags()),
        };
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl Projection {
    /// The listing as a JSON object holding only the projected fields.
    pub fn project(&self, listing: &Listing) -> Map<String, JsonValue> {
        match self {
            Self::All => listing.to_json_map(),
            Self::Fields(fields) => fields
                .iter()
                .map(|f| (f.as_str().to_string(), listing.field_value(*f)))
                .collect(),
        }
    }
}

impl QueryDescriptor {
    /// Filter, sort and page `items` in memory.
    ///
    /// `items` is taken to be in insertion order; the sort is stable, so ties
    /// keep that order. Projection is left to the caller.
    pub fn apply<'a, T, F>(&self, items: &'a [T], listing_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &Listing,
    {
        let mut matched: Vec<&T> = items
            .iter()
            .filter(|item| self.filter.matches(listing_of(*item)))
            .collect();

        if let Some(sort) = self.sort {
            matched.sort_by(|a, b| sort.compare(listing_of(*a), listing_of(*b)));
        }

        let skip = self
            .skip
            .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
        let limit = self
            .limit
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        matched.into_iter().skip(skip).take(limit).collect()
    }

    /// Number of `listings` matching the filter, ignoring paging.
    pub fn count<'a, I>(&self, listings: I) -> u64
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings
            .into_iter()
            .filter(|l| self.filter.matches(l))
            .count() as u64
    }
}
