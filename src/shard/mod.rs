//! Region shard routing.
//!
//! Candidate addresses may be split into one dataset per region. A query
//! resolves the reference site's region tag to exactly one shard and loads
//! only that shard.

mod registry;

pub use registry::{Shard, ShardRegistry};

use std::sync::Arc;
use tracing::info;

use crate::dataset::{DatasetCache, DatasetLoader};
use crate::error::{Error, Result};
use crate::models::{CanonicalRecord, Role};
use crate::normalize::Normalized;

/// Pick the shard for a reference site's region tag.
pub fn resolve_shard<'a>(
    reference: &CanonicalRecord,
    registry: &'a ShardRegistry,
) -> Result<&'a Shard> {
    let tag = reference
        .region_tag
        .as_deref()
        .ok_or_else(|| Error::MissingRegionTag(reference.site.id_text().to_string()))?;

    let shard = registry.get(tag).ok_or_else(|| Error::UnknownRegion {
        tag: tag.to_string(),
        known: registry.tags(),
    })?;

    info!(
        "Routing '{}' (region {}) to shard {}",
        reference.site.id_text(),
        tag,
        shard.locator
    );
    Ok(shard)
}

/// Resolve the shard for `reference` and load just that shard.
pub async fn load_candidates(
    reference: &CanonicalRecord,
    registry: &ShardRegistry,
    loader: &DatasetLoader,
    cache: &DatasetCache,
) -> Result<Arc<Normalized>> {
    let shard = resolve_shard(reference, registry)?;
    cache
        .get_or_load(loader, &shard.locator, Role::Candidate)
        .await
}
