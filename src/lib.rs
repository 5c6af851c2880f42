//! Radius - find the addresses within a radius of a school.
//!
//! Normalizes loosely-formatted school and address datasets into a canonical
//! schema, routes a school to its region's address shard, and runs haversine
//! proximity queries. Shared by the `nearby` binary.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod proximity;
pub mod shard;

pub use error::{Error, Result, RowRejection, RowValidationError};
pub use models::{CanonicalRecord, CanonicalSite, CanonicalTable, ProximityResult, Role};
pub use normalize::{normalize, Normalized};
pub use proximity::{haversine_miles, query, query_with_order, ResultOrder};
pub use shard::{resolve_shard, ShardRegistry};
