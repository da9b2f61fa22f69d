//! Query module
//!
//! Builds the query DSL sent to the cluster:
//! - Filters: one `match` clause per field, combined with AND
//! - Time windows: an inclusive `range` clause on a date field
//! - Empty conditions: `match_all`
//!
//! and parses the count and search responses that come back.

mod builder;
mod response;

pub use builder::{BoolQuery, Filter, TimeWindow, SORT_FIELD};
pub use response::{CountResponse, Hit, Hits, SearchResponse, TotalHits};
