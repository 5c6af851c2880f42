//! Canonical data model shared by the normalizer, router and query engine.

pub mod result;
pub mod site;

pub use result::{ExportRecord, ProximityResult};
pub use site::{CanonicalRecord, CanonicalSite, CanonicalTable, Role};
