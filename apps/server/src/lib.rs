//! Nodepop listings server
//!
//! HTTP API for a classified-ads catalogue:
//! - Search listings by title fragment, tag, sale flag and price range
//! - Publish new listings from JSON or form bodies
//! - Per-tag listing counts
//!
//! Parameter validation and query construction live in `nodepop_query`;
//! this crate adds storage backends and the HTTP surface.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
