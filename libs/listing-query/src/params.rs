//! Validated read-query parameters

use crate::listing::ListingField;
use crate::price::PriceRange;
use crate::tag::Tag;
use std::fmt;

/// Read-mode parameters after validation. Built once per request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    /// Lowercased title fragment. Blank input is stored as `None`.
    pub item: Option<String>,
    pub for_sale: Option<bool>,
    pub tag: Option<Tag>,
    pub price: Option<PriceRange>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<SortSpec>,
    pub fields: Option<Vec<ListingField>>,
}

/// Sortable listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Item,
    Price,
    Sale,
}

impl SortField {
    pub fn listing_field(self) -> ListingField {
        match self {
            Self::Item => ListingField::Title,
            Self::Price => ListingField::Price,
            Self::Sale => ListingField::ForSale,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Price => "price",
            Self::Sale => "sale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: Direction,
}

impl SortSpec {
    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Parse one of `item`, `-item`, `price`, `-price`, `sale`, `-sale` (any case).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let (direction, name) = match value.strip_prefix('-') {
            Some(rest) => (Direction::Descending, rest),
            None => (Direction::Ascending, value.as_str()),
        };
        let field = match name {
            "item" => SortField::Item,
            "price" => SortField::Price,
            "sale" => SortField::Sale,
            _ => return None,
        };
        Some(Self { field, direction })
    }

    pub fn is_descending(self) -> bool {
        self.direction == Direction::Descending
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}
