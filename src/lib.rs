//! Immo Catalog Library
//!
//! Property cache and geolocation-enrichment engine behind a
//! real-estate listing application: an in-memory catalog kept
//! consistent with a remote document store, a per-user favorites
//! overlay, and best-effort address geocoding with a concurrent
//! bulk-repair pass.

pub mod catalog;
pub mod domain;
pub mod infrastructure;
