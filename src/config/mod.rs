//! Configuration loading for the entitylink core.

mod settings;

pub use settings::{
    CacheConfig, CheckerConfig, Config, HierarchyConfig, KbConfig, OutputConfig, RuntimeConfig,
    SameAsConfig, DEFAULT_MEMORY_CACHE_CAPACITY, DEFAULT_WORKERS,
};
