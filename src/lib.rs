pub mod config;
pub mod feed;
pub mod gateway;
pub mod global;
pub mod http;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod mock_upstream;
