//! Query string serialization
//!
//! Values are JSON values so callers can pass numbers, booleans and strings
//! uniformly. `null` entries are dropped rather than stringified; falsy
//! values such as `0`, `false` and `""` are kept.

use gamelink_domain::PageQuery;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::errors::RequestFailure;

/// Ordered query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, Value)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any value that serializes to a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RequestFailure> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
            Ok(Value::Null) => Ok(Self::new()),
            Ok(other) => Err(RequestFailure::invalid_request(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
            Err(err) => Err(RequestFailure::invalid_request(format!(
                "failed to serialize query parameters: {err}"
            ))),
        }
    }

    /// Set a parameter, replacing an existing value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder-style [`QueryParams::set`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pairs.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    /// True when nothing would be emitted
    pub fn is_empty(&self) -> bool {
        self.pairs.iter().all(|(_, value)| value.is_null())
    }

    /// Form-urlencoded pairs without a leading `?`
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            if let Some(text) = stringify(value) {
                serializer.append_pair(key, &text);
            }
        }
        serializer.finish()
    }

    /// `?`-prefixed query string, or an empty string when there is nothing
    /// to send
    pub fn to_query_string(&self) -> String {
        let encoded = self.encode();
        if encoded.is_empty() {
            encoded
        } else {
            format!("?{encoded}")
        }
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

impl From<&PageQuery> for QueryParams {
    fn from(query: &PageQuery) -> Self {
        let mut params = Self::new();
        if let Some(page) = query.page {
            params.set("page", page);
        }
        if let Some(page_size) = query.page_size {
            params.set("page_size", page_size);
        }
        if let Some(sort_by) = &query.sort_by {
            params.set("sort_by", sort_by.as_str());
        }
        if let Some(order) = query.sort_order {
            params.set("sort_order", order.as_str());
        }
        if let Some(keyword) = &query.keyword {
            params.set("keyword", keyword.as_str());
        }
        for (key, value) in &query.filters {
            params.set(key.as_str(), value.clone());
        }
        params
    }
}
