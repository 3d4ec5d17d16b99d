//! Cache module
//!
//! A key-value cache with per-entry expiry, used by the task repository as an
//! optimization in front of the store. Backends:
//! - [`RedisCache`]: shared Redis instance
//! - [`MemoryCache`]: bounded single-process cache (moka)
//! - [`NoOpCache`]: caching disabled

mod error;
pub mod keys;
mod memory;
mod noop;
mod redis_cache;
mod traits;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use redis_cache::{redact_url, RedisCache};
pub use traits::Cache;
