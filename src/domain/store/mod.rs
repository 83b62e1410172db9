//! Store domain - Backing key-value store abstraction

mod repository;

pub use repository::KeyValueStore;
