//! Cellarscope core library
//!
//! Everything the admin dashboard knows about its data lives here:
//!
//! - [`scan`] classifies, counts, filters and loads recognition scans
//! - [`catalog`] pages through the wine catalog and keeps a TTL cache of it
//! - [`presentation`] turns scan records into render-ready rows
//! - [`providers`] talks to the hosted document database and the catalog API
//!
//! The HTTP surface is in the `cellarscope-server` crate.

#![allow(missing_docs)]

pub mod api_routes;
pub mod catalog;
pub mod error;
pub mod numbers;
pub mod presentation;
pub mod providers;
pub mod scan;

pub use cellarscope_model as model;

pub use error::FilterError;
pub use presentation::ScanView;
pub use providers::{CatalogSource, ProviderError, ScanDocument, ScanSource};
