//! Dataset retrieval and memoization around the normalizer.

mod cache;
mod loader;
mod locator;

pub use cache::{DatasetCache, DatasetKey};
pub use loader::DatasetLoader;
pub use locator::DatasetLocator;
