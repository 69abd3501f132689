//! Query translation and validation for Nodepop listings.
//!
//! Turns untrusted request parameters into either typed values or a list of
//! field-level [`ValidationError`]s, and turns validated read parameters into a
//! storage-agnostic [`QueryDescriptor`]:
//! - [`validate_query`] / [`validate_new_listing`] apply the read and create rule tables
//! - [`build_query`] maps [`QueryParameters`] to a [`QueryDescriptor`]
//! - [`tag_count_plan`] composes one count query per [`Tag`]

#![forbid(unsafe_code)]

mod bag;
mod error;
mod listing;
mod params;
mod price;
mod query;
mod tag;
mod validate;

pub use bag::ParamBag;
pub use error::{Result, ValidationError, ValidationErrors};
pub use listing::{Listing, ListingField, NewListing, TagsInput};
pub use params::{Direction, QueryParameters, SortField, SortSpec};
pub use price::PriceRange;
pub use query::{
    build_query, tag_count_plan, Criterion, Filter, Projection, QueryDescriptor, Scalar,
};
pub use tag::Tag;
pub use validate::{validate, validate_new_listing, validate_query, Mode, Validated};
