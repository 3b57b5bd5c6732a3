pub mod client;
pub mod query;

pub use client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, OryxClient, OryxClientConfig};
