//! Core data model definitions shared across Cellarscope crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod scan;
pub mod wine;

pub use scan::{RawScanDocument, ScanRecord, ScanStatus, ScanType};
pub use wine::{CatalogPage, WineEntry, WineType};
