//! Description of a single API call

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::query::QueryParams;
use crate::errors::RequestFailure;

/// Method, path, query, body and headers of one logical request
///
/// The JSON body is serialized once when attached, so every retry resends
/// exactly the same payload.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        Self { method, path, query: QueryParams::new(), body: None, headers: HeaderMap::new() }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set a single query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.set(key, value);
        self
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestFailure> {
        let value = serde_json::to_value(body).map_err(|err| {
            RequestFailure::invalid_request(format!("failed to serialize request body: {err}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header; caller headers override the default `Content-Type`
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn query_params(&self) -> &QueryParams {
        &self.query
    }

    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Path followed by the query string, with no `?` when the query is empty
    pub fn path_and_query(&self) -> String {
        format!("{}{}", self.path, self.query.to_query_string())
    }
}
