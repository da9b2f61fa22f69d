//! Document-level operations over the cluster connection

use super::document::{DocumentRef, Payload};
use crate::cluster::{self, ClusterConnection, ConnectionState};
use crate::config::ClusterSettings;
use crate::error::Result;
use crate::network::{document_path, ClusterRequest};
use crate::query::{BoolQuery, CountResponse, Filter, SearchResponse, TimeWindow};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Save, count and fetch documents on the search cluster.
///
/// Reads swallow failures: `count` returns 0 and the `query*` methods
/// return whatever was decoded before the error, logging the cause. The
/// `try_*` variants report the error instead.
///
/// Every queried type must carry an indexable, sortable `id` field;
/// results are always sorted on it in ascending order.
#[derive(Clone, Debug)]
pub struct SearchGateway {
    settings: ClusterSettings,
    connection: Arc<ClusterConnection>,
}

impl SearchGateway {
    /// Attach to the process-wide connection, creating it on first use
    pub fn new(settings: ClusterSettings) -> Result<Self> {
        let connection = cluster::shared(&settings)?;
        Ok(Self {
            settings,
            connection,
        })
    }

    /// Use a connection owned by the caller instead of the shared one
    pub fn with_connection(connection: Arc<ClusterConnection>) -> Self {
        Self {
            settings: connection.settings().clone(),
            connection,
        }
    }

    /// Settings this instance was constructed with
    pub fn settings(&self) -> &ClusterSettings {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Index a document of JSON text or any serializable value, replacing an existing one
    pub async fn save<T: Serialize + ?Sized>(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        document: &T,
    ) -> Result<()> {
        let payload = Payload::from_serialize(document)?;
        self.save_payload(index, doc_type, id, payload).await
    }

    /// Index a document given as JSON text
    pub async fn save_json(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        json: impl Into<String>,
    ) -> Result<()> {
        self.save_payload(index, doc_type, id, Payload::Json(json.into()))
            .await
    }

    /// Index a prepared payload
    pub async fn save_payload(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        payload: Payload,
    ) -> Result<()> {
        let doc = DocumentRef::new(index, doc_type, id)?;
        let request = ClusterRequest::put(doc.path())
            .param("refresh", self.connection.settings().refresh.as_param())
            .raw(payload.into_body()?);

        self.connection.send(request).await?.error_for_status()?;
        debug!("Saved {}/{}/{}", index, doc_type, id);
        Ok(())
    }

    /// Number of matching documents, 0 on any failure
    pub async fn count(&self, index: &str, doc_type: &str, filter: Option<&Filter>) -> u64 {
        match self.try_count(index, doc_type, filter).await {
            Ok(count) => count,
            Err(e) => {
                error!("Count on {}/{} failed: {}", index, doc_type, e);
                0
            }
        }
    }

    /// Number of matching documents
    pub async fn try_count(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
    ) -> Result<u64> {
        let query = BoolQuery::from_filter(filter);
        self.count_query(index, doc_type, &query).await
    }

    /// All matching documents sorted by id; partial on failure
    pub async fn query<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
    ) -> Vec<T> {
        self.query_window(index, doc_type, filter, None).await
    }

    /// All matching documents sorted by id
    pub async fn try_query<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<T>> {
        self.try_query_window(index, doc_type, filter, None).await
    }

    /// Like [`query`](Self::query), restricted to `[start, end]` on `time_field`.
    ///
    /// The range only applies when `time_field` is non-empty and both bounds are given.
    pub async fn query_in_range<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
        time_field: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<T> {
        let window = TimeWindow::new(time_field, start, end);
        self.query_window(index, doc_type, filter, Some(&window))
            .await
    }

    pub async fn try_query_in_range<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
        time_field: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<T>> {
        let window = TimeWindow::new(time_field, start, end);
        self.try_query_window(index, doc_type, filter, Some(&window))
            .await
    }

    async fn query_window<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
        window: Option<&TimeWindow>,
    ) -> Vec<T> {
        let query = BoolQuery::from_filter(filter).within(window);
        let mut documents = Vec::new();
        if let Err(e) = self.collect(index, doc_type, &query, &mut documents).await {
            error!(
                "Query on {}/{} failed after {} document(s): {}",
                index,
                doc_type,
                documents.len(),
                e
            );
        }
        documents
    }

    async fn try_query_window<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        filter: Option<&Filter>,
        window: Option<&TimeWindow>,
    ) -> Result<Vec<T>> {
        let query = BoolQuery::from_filter(filter).within(window);
        let mut documents = Vec::new();
        self.collect(index, doc_type, &query, &mut documents).await?;
        Ok(documents)
    }

    /// Count the matches, then fetch them in one page sorted by id
    async fn collect<T: DeserializeOwned>(
        &self,
        index: &str,
        doc_type: &str,
        query: &BoolQuery,
        out: &mut Vec<T>,
    ) -> Result<()> {
        let total = self
            .count_query(index, doc_type, query)
            .await?
            .min(i32::MAX as u64);
        if total == 0 {
            return Ok(());
        }

        let path = format!("{}/_search", document_path([index, doc_type]));
        let request = ClusterRequest::post(path).json(query.search_body(total));
        let response: SearchResponse = self
            .connection
            .send(request)
            .await?
            .error_for_status()?
            .json()?;

        out.reserve(response.hits.hits.len());
        for hit in response.hits.hits {
            out.push(serde_json::from_value(hit.source)?);
        }
        debug!("Fetched {} document(s) from {}/{}", out.len(), index, doc_type);
        Ok(())
    }

    async fn count_query(&self, index: &str, doc_type: &str, query: &BoolQuery) -> Result<u64> {
        let path = format!("{}/_count", document_path([index, doc_type]));
        let request = ClusterRequest::post(path).json(query.count_body());
        let response: CountResponse = self
            .connection
            .send(request)
            .await?
            .error_for_status()?
            .json()?;
        Ok(response.count)
    }

    /// Close the underlying connection. Not for normal operation; a
    /// second call does nothing.
    pub fn teardown(&self) {
        self.connection.close();
    }
}
