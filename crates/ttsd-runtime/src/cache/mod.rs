//! Audio cache adapters.
//!
//! `MemoryCache` keeps entries in this process. `RedisCache` talks to a shared
//! Redis server so several replicas see the same entries and restarts keep
//! them.

mod memory;
mod redis_store;

pub use memory::MemoryCache;
pub use redis_store::RedisCache;
