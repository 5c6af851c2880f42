//! Explicit memo of normalized datasets keyed by (locator, role).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use super::{DatasetLoader, DatasetLocator};
use crate::error::Result;
use crate::models::Role;
use crate::normalize::Normalized;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub locator: DatasetLocator,
    pub role: Role,
}

impl DatasetKey {
    pub fn new(locator: &DatasetLocator, role: Role) -> Self {
        Self {
            locator: locator.clone(),
            role,
        }
    }
}

/// In-memory cache of normalized datasets.
///
/// The lock is never held while loading, so two callers asking for the same
/// missing key both load it; normalization is deterministic so either result
/// is fine to keep.
#[derive(Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<DatasetKey, Arc<Normalized>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DatasetKey) -> Option<Arc<Normalized>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: DatasetKey, value: Normalized) -> Arc<Normalized> {
        let value = Arc::new(value);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&value));
        value
    }

    /// Return the cached dataset or load, normalize and remember it.
    pub async fn get_or_load(
        &self,
        loader: &DatasetLoader,
        locator: &DatasetLocator,
        role: Role,
    ) -> Result<Arc<Normalized>> {
        let key = DatasetKey::new(locator, role);
        if let Some(hit) = self.get(&key) {
            debug!("Cache hit for {} dataset {}", role, locator);
            return Ok(hit);
        }

        let normalized = loader.load(locator, role).await?;
        Ok(self.insert(key, normalized))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
