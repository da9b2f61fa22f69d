//! Boolean query construction

use crate::time::format_bound;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

/// Field every queried document type must carry; results are sorted on it
pub const SORT_FIELD: &str = "id";

/// Field to value matches, combined with AND. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match on `field`
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, Value>> for Filter {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Inclusive time range on a document field
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub field: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(
        field: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            field: field.into(),
            start,
            end,
        }
    }

    /// Range clause, only when the field is named and both bounds are set
    pub fn clause(&self) -> Option<Value> {
        if self.field.is_empty() {
            return None;
        }
        let (start, end) = (self.start.as_ref()?, self.end.as_ref()?);
        Some(json!({
            "range": {
                self.field.as_str(): {
                    "gte": format_bound(start),
                    "lte": format_bound(end),
                }
            }
        }))
    }
}

/// Conjunction of `match` clauses and optional range clauses
#[derive(Debug, Clone, Default)]
pub struct BoolQuery {
    must: Vec<Value>,
}

impl BoolQuery {
    /// One `match` clause per filter entry
    pub fn from_filter(filter: Option<&Filter>) -> Self {
        let must = filter
            .map(|f| {
                f.iter()
                    .map(|(field, value)| json!({ "match": { field.as_str(): value } }))
                    .collect()
            })
            .unwrap_or_default();
        Self { must }
    }

    /// Add the window's range clause if it applies
    pub fn within(mut self, window: Option<&TimeWindow>) -> Self {
        if let Some(clause) = window.and_then(TimeWindow::clause) {
            self.must.push(clause);
        }
        self
    }

    pub fn clauses(&self) -> &[Value] {
        &self.must
    }

    /// Query DSL; no clauses yields `match_all`
    pub fn to_json(&self) -> Value {
        if self.must.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "must": self.must } })
        }
    }

    /// Body for the `_count` endpoint
    pub fn count_body(&self) -> Value {
        json!({ "query": self.to_json() })
    }

    /// Body for a `_search` returning the first `size` hits sorted by id
    pub fn search_body(&self, size: u64) -> Value {
        json!({
            "query": self.to_json(),
            "sort": [{ SORT_FIELD: { "order": "asc" } }],
            "from": 0,
            "size": size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(
            BoolQuery::from_filter(None).to_json(),
            json!({"match_all": {}})
        );
        assert_eq!(
            BoolQuery::from_filter(Some(&Filter::new())).to_json(),
            json!({"match_all": {}})
        );
    }

    #[test]
    fn test_filter_entries_become_match_clauses() {
        let filter = Filter::new().with("kind", "boot").with("host", "a");
        let query = BoolQuery::from_filter(Some(&filter));
        assert_eq!(
            query.to_json(),
            json!({"bool": {"must": [
                {"match": {"host": "a"}},
                {"match": {"kind": "boot"}},
            ]}})
        );
    }

    #[test]
    fn test_superset_filter_keeps_every_clause() {
        let narrow = Filter::new().with("kind", "boot");
        let wide = narrow.clone().with("host", "a");
        let narrow_q = BoolQuery::from_filter(Some(&narrow));
        let wide_q = BoolQuery::from_filter(Some(&wide));
        for clause in narrow_q.clauses() {
            assert!(wide_q.clauses().contains(clause));
        }
    }

    #[test]
    fn test_range_clause() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        let window = TimeWindow::new("ts", Some(start), Some(end));

        let query = BoolQuery::from_filter(None).within(Some(&window));
        assert_eq!(
            query.to_json(),
            json!({"bool": {"must": [
                {"range": {"ts": {
                    "gte": "2020-01-01T00:00:00.000Z",
                    "lte": "2020-01-02T00:00:00.000Z",
                }}},
            ]}})
        );
    }

    #[test]
    fn test_incomplete_window_is_ignored() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let filter = Filter::new().with("kind", "boot");
        let plain = BoolQuery::from_filter(Some(&filter)).to_json();

        for window in [
            TimeWindow::new("", Some(start), Some(start)),
            TimeWindow::new("ts", None, Some(start)),
            TimeWindow::new("ts", Some(start), None),
        ] {
            let query = BoolQuery::from_filter(Some(&filter)).within(Some(&window));
            assert_eq!(query.to_json(), plain);
        }
    }

    #[test]
    fn test_search_body_sorts_by_id() {
        let body = BoolQuery::from_filter(None).search_body(7);
        assert_eq!(body["sort"], json!([{"id": {"order": "asc"}}]));
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 7);
    }
}
