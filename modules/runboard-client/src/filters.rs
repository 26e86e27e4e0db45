//! List-fetch filters and their query-string / history coupling.

use std::collections::BTreeMap;
use std::fmt;

/// A single filter value. Numbers render without a trailing `.0` when whole.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Str(s) => write!(f, "{s}"),
            FilterValue::Num(n) => write!(f, "{n}"),
            FilterValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Str(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Str(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Num(v as f64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Num(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

/// Filter map serialized into a list fetch's query string.
/// BTreeMap keeps serialization deterministic.
#[derive(Debug, Clone, Default)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }
}

/// History coupling for list fetches: filters present and no current query
/// fragment → push the filtered path; no filters while a fragment lingers →
/// reset to the bare path; otherwise leave history alone.
pub fn history_push(path: &str, query: &str, current_query: Option<&str>) -> Option<String> {
    let has_current = current_query.is_some_and(|q| !q.is_empty());
    if !query.is_empty() && !has_current {
        Some(format!("{path}?{query}"))
    } else if query.is_empty() && has_current {
        Some(path.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_is_deterministic_and_typed() {
        let filters = Filters::new()
            .with("query", "status:running")
            .with("limit", 20)
            .with("independent", true);

        assert_eq!(
            filters.to_query_string(),
            "independent=true&limit=20&query=status%3Arunning"
        );
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        let filters = Filters::new().with("offset", 40).with("metric", 0.85);
        assert_eq!(filters.to_query_string(), "metric=0.85&offset=40");
    }

    #[test]
    fn empty_filters_serialize_to_empty_string() {
        assert_eq!(Filters::new().to_query_string(), "");
    }

    #[test]
    fn history_pushes_filtered_path_when_view_has_no_query() {
        assert_eq!(
            history_push("alice/vision/experiments", "limit=20", None),
            Some("alice/vision/experiments?limit=20".to_string())
        );
        assert_eq!(
            history_push("alice/vision/experiments", "limit=20", Some("")),
            Some("alice/vision/experiments?limit=20".to_string())
        );
    }

    #[test]
    fn history_resets_to_bare_path_when_filters_cleared() {
        assert_eq!(
            history_push("alice/vision/experiments", "", Some("limit=20")),
            Some("alice/vision/experiments".to_string())
        );
    }

    #[test]
    fn history_untouched_otherwise() {
        assert_eq!(history_push("p", "", None), None);
        assert_eq!(history_push("p", "a=1", Some("b=2")), None);
    }
}
