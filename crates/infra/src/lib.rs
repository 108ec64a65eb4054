//! # GameLink Infrastructure
//!
//! The "impure" side of the GameLink API client.
//!
//! This crate contains:
//! - The HTTP transport (reqwest, cookie store)
//! - The request pipeline: query serialization, bearer tokens, retries and
//!   envelope validation
//! - Token store implementations
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Wire types and errors come from `gamelink-domain`
//! - The retry engine comes from `gamelink-common`
//! - Contains all I/O

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiRequest, FileTokenProvider, FileTokenStore, InMemoryTokenStore,
    NoTokenProvider, QueryParams, StaticTokenProvider, StoredTokenProvider, TokenProvider, TokenStore,
};
pub use errors::RequestFailure;
pub use http::{HttpClient, HttpClientBuilder, RawResponse};
