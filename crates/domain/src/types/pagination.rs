//! Pagination request and response shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction accepted by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query for a paginated list endpoint
///
/// Every field is optional; unset fields are left out of the query string.
/// Endpoint-specific filters go in `filters` and are sent alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, Value>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Add an endpoint-specific filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPageResult<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

// The backend sends `list` and may omit the navigation flags.
#[derive(Deserialize)]
struct RawPageResult<T> {
    #[serde(alias = "list")]
    items: Vec<T>,
    total: u64,
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    page_size: u32,
    #[serde(default)]
    has_next: Option<bool>,
    #[serde(default)]
    has_prev: Option<bool>,
}

const fn first_page() -> u32 {
    1
}

impl<T> From<RawPageResult<T>> for PageResult<T> {
    fn from(raw: RawPageResult<T>) -> Self {
        let has_next = raw
            .has_next
            .unwrap_or_else(|| u64::from(raw.page) * u64::from(raw.page_size) < raw.total);
        let has_prev = raw.has_prev.unwrap_or(raw.page > 1);

        Self {
            items: raw.items,
            total: raw.total,
            page: raw.page,
            page_size: raw.page_size,
            has_next,
            has_prev,
        }
    }
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        RawPageResult { items, total, page, page_size, has_next: None, has_prev: None }.into()
    }

    /// Number of pages implied by `total` and `page_size`
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the paging metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_page_query_serializes_only_set_fields() {
        let query = PageQuery::new()
            .page(2)
            .page_size(20)
            .sort_by("created_at", SortOrder::Desc)
            .filter("status", "pending");

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "page": 2,
                "page_size": 20,
                "sort_by": "created_at",
                "sort_order": "desc",
                "status": "pending"
            })
        );
        assert_eq!(serde_json::to_value(PageQuery::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_page_result_accepts_list_alias_and_derives_flags() {
        let page: PageResult<u32> = serde_json::from_value(json!({
            "list": [1, 2, 3],
            "total": 7,
            "page": 2,
            "page_size": 3
        }))
        .unwrap();

        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_page_result_explicit_flags_win() {
        let page: PageResult<u32> = serde_json::from_value(json!({
            "items": [],
            "total": 100,
            "page": 1,
            "page_size": 10,
            "has_next": false,
            "has_prev": true
        }))
        .unwrap();

        assert!(!page.has_next);
        assert!(page.has_prev);
        assert!(page.is_empty());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = PageResult::new(vec!["a"], 5, 5, 1);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_map_preserves_metadata() {
        let page = PageResult::new(vec![1, 2], 4, 1, 2).map(|n| n * 10);

        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 4);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_zero_page_size_has_no_pages() {
        let page: PageResult<u8> =
            serde_json::from_value(json!({"list": [], "total": 0})).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next);
    }
}
