//! Storage-agnostic query descriptors
//!
//! A [`QueryDescriptor`] is the whole read request in typed form: a
//! conjunction of per-field criteria, pagination, an optional sort and a
//! projection. Storage backends translate it; [`QueryDescriptor::apply`]
//! evaluates it over listings already in memory.

mod aggregate;
mod builder;
mod eval;

pub use aggregate::tag_count_plan;
pub use builder::build_query;

use crate::listing::ListingField;
use crate::params::SortSpec;
use crate::tag::Tag;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Value compared by an exact-match criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Decimal),
    Text(String),
}

/// Match rule for one listing field.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Field equals the value.
    Equals(Scalar),
    /// Text field contains the (lowercase) fragment, ignoring case.
    ContainsIgnoreCase(String),
    /// Numeric field within inclusive bounds; `None` is unbounded.
    Range {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Tag set contains the tag.
    Includes(Tag),
}

/// Conjunction of criteria, at most one per field. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    criteria: BTreeMap<ListingField, Criterion>,
}

impl Filter {
    /// Filter with no criteria.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: ListingField, criterion: Criterion) -> Self {
        self.criteria.insert(field, criterion);
        self
    }

    pub fn get(&self, field: ListingField) -> Option<&Criterion> {
        self.criteria.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ListingField, &Criterion)> {
        self.criteria.iter().map(|(f, c)| (*f, c))
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Which listing fields a result carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Projection {
    #[default]
    All,
    Fields(Vec<ListingField>),
}

impl Projection {
    pub fn includes(&self, field: ListingField) -> bool {
        match self {
            Self::All => true,
            Self::Fields(fields) => fields.contains(&field),
        }
    }
}

/// Everything storage needs to answer one read request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    pub filter: Filter,
    /// Results to skip; `None` starts from the first match.
    pub skip: Option<u64>,
    /// Maximum results; `None` returns every remaining match.
    pub limit: Option<u64>,
    /// `None` keeps insertion order.
    pub sort: Option<SortSpec>,
    pub projection: Projection,
}

impl QueryDescriptor {
    /// Descriptor with only a filter: no paging, default order, all fields.
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}
