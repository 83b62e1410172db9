//! Fetch infrastructure - HTTP page fetcher

mod http;

pub use http::HttpPageFetcher;
