//! Domain models for the listings server

pub mod listing;

pub use listing::ListingRecord;
