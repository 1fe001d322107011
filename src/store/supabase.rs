use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

const DOCUMENTS_TABLE: &str = "chatbot_embeddings";
const FACILITIES_TABLE: &str = "publicFacilities";
const PLACES_TABLE: &str = "administrative_welfare_centers";
const QUERY_LOG_TABLE: &str = "chatbot_query_logs";

/// The two content domains the chatbot answers from. A domain picks both
/// the source table recorded at ingestion time and the search procedure
/// used at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Facility,
    News,
}

impl Domain {
    /// Label used by the query router and the query log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Facility => "facility",
            Domain::News => "news",
        }
    }

    /// Originating table recorded on every stored document.
    pub fn source_table(&self) -> &'static str {
        match self {
            Domain::Facility => FACILITIES_TABLE,
            Domain::News => "gunsan_news",
        }
    }

    fn search_function(&self) -> &'static str {
        match self {
            Domain::Facility => "hybrid_search_facilities",
            Domain::News => "hybrid_search_news",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to the document store failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("document store rejected the request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("document store returned an unusable response: {0}")]
    Decode(String),
}

/// One row of the `chatbot_embeddings` table. `source_id` is the
/// idempotency key; re-ingestion overwrites the row in place.
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub source_table: String,
    pub source_id: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// One ranked row returned by a hybrid-search procedure. Ordering is
/// owned by the procedure, not by this client.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub content: String,
    #[serde(default)]
    pub score: f32,
}

/// Tuning parameters passed through to the search procedures.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub match_count: usize,
    pub match_threshold: f32,
}

/// Best-effort audit record of one answered question.
#[derive(Debug, Clone, Serialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub route: String,
    pub result_count: usize,
    pub created_at: String,
}

/// PostgREST client for the chatbot's Supabase project.
///
/// The anon key authenticates the anonymous read paths; the service role
/// key authenticates document upserts, the search procedures and the
/// query log.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    anon_key: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: String, anon_key: String, service_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            service_key,
        }
    }

    /// Store handle for ingestion jobs, which run every call under the
    /// service role key.
    pub fn service_only(base_url: String, service_key: String) -> Self {
        Self::new(base_url, service_key.clone(), service_key)
    }

    /// Upserts one embedded chunk, keyed on `source_id`.
    pub async fn upsert_document(&self, doc: &StoredDocument) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, DOCUMENTS_TABLE);
        let res = self
            .client
            .post(&url)
            .query(&[("on_conflict", "source_id")])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(std::slice::from_ref(doc))
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    /// Runs the domain's hybrid keyword+vector search procedure.
    pub async fn hybrid_search(
        &self,
        domain: Domain,
        query_text: &str,
        query_embedding: &[f32],
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let url = format!(
            "{}/rest/v1/rpc/{}",
            self.base_url,
            domain.search_function()
        );
        let body = json!({
            "query_text": query_text,
            "query_embedding": query_embedding,
            "match_count": options.match_count,
            "match_threshold": options.match_threshold,
        });
        let res = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await?;
        let res = Self::check(res).await?;
        res.json::<Vec<SearchResult>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    /// Names of every administrative welfare center, used to anchor
    /// place mentions to known places.
    pub async fn list_place_names(&self) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, PLACES_TABLE);
        let res = self
            .client
            .get(&url)
            .query(&[("select", "name")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;
        let res = Self::check(res).await?;
        let rows: Vec<NameRow> = res
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    /// Counts facilities registered at a place without fetching rows: a
    /// HEAD request with `Prefer: count=exact`, total read back from the
    /// `Content-Range` header.
    pub async fn count_facilities_at(&self, place: &str) -> Result<u64, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, FACILITIES_TABLE);
        let spot = format!("eq.{}", place);
        let res = self
            .client
            .head(&url)
            .query(&[("select", "*"), ("spot", spot.as_str())])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let res = Self::check(res).await?;
        let header = res
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StoreError::Decode("missing content-range header".to_string()))?;
        parse_exact_count(header)
            .ok_or_else(|| StoreError::Decode(format!("unparseable content-range: {}", header)))
    }

    /// Appends one row to the query log.
    pub async fn insert_query_log(&self, entry: &QueryLogEntry) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, QUERY_LOG_TABLE);
        let res = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(std::slice::from_ref(entry))
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(StoreError::Rejected { status, body })
    }
}

#[derive(Deserialize)]
struct NameRow {
    name: String,
}

/// Extracts the total from a PostgREST `Content-Range` value such as
/// `0-24/3573` or `*/0`.
pub(crate) fn parse_exact_count(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}
