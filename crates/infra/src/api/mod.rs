//! GameLink API request pipeline
//!
//! [`ApiClient`] turns an [`ApiRequest`] into a typed payload: it serializes
//! query parameters, attaches the bearer token, retries transient failures
//! and validates the response envelope.

pub mod auth;
pub mod client;
pub mod query;
pub mod request;

pub use auth::{
    FileTokenProvider, FileTokenStore, InMemoryTokenStore, NoTokenProvider, StaticTokenProvider,
    StoredTokenProvider, TokenProvider, TokenStore,
};
pub use client::{ApiClient, ApiClientBuilder};
pub use query::QueryParams;
pub use request::ApiRequest;
