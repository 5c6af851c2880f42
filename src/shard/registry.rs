//! Region tag to candidate dataset mapping.

use std::collections::BTreeMap;

use crate::dataset::DatasetLocator;
use crate::error::{Error, Result};

/// One region's candidate dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Tag as configured (original spelling)
    pub tag: String,
    pub locator: DatasetLocator,
}

/// Static registry of shards. Tags are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ShardRegistry {
    shards: BTreeMap<String, Shard>,
}

impl ShardRegistry {
    /// Build the registry, rejecting tags that collide ignoring case.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, DatasetLocator)>,
        S: Into<String>,
    {
        let mut shards = BTreeMap::new();
        for (tag, locator) in entries {
            let tag: String = tag.into();
            let key = fold(&tag);
            if shards.contains_key(&key) {
                return Err(Error::DuplicateRegion(tag));
            }
            shards.insert(key, Shard { tag, locator });
        }
        Ok(Self { shards })
    }

    pub fn get(&self, tag: &str) -> Option<&Shard> {
        self.shards.get(&fold(tag))
    }

    /// Configured tags, sorted
    pub fn tags(&self) -> Vec<String> {
        self.shards.values().map(|s| s.tag.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

fn fold(tag: &str) -> String {
    tag.trim().to_lowercase()
}
