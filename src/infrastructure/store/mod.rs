//! Store infrastructure - Backing-store implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{StoreConfig, StoreFactory, StoreKind};
pub use in_memory::InMemoryStore;
pub use redis::{RedisStore, RedisStoreConfig};
