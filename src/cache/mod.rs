//! Fragment caching

pub mod fragment;

pub use fragment::{
    spawn_sweep_task, CacheStatsSnapshot, FragmentCache, FragmentCacheConfig,
};
