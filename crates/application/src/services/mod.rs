mod cache_engine;

pub use cache_engine::{CacheEngine, CacheSettings};
