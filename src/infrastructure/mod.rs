//! Infrastructure layer - adapters for the domain traits

pub mod cache;
pub mod fetch;
pub mod logging;
pub mod store;
