//! Patient search: `GET <search-url>?dni=<digits>`.
//!
//! [`SearchClient`] is the raw endpoint call. [`SearchDriver`] adds the
//! interaction policy: a 300 ms debounce and a generation token that drops
//! responses belonging to superseded queries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use intake_types::PatientSummary;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Debounce window between the last keystroke and the network request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries are composed digit-by-digit and capped at a full cédula.
pub const QUERY_MAX_DIGITS: usize = 10;

#[derive(Deserialize)]
struct SearchResponse {
    patients: Vec<PatientSummary>,
}

/// Raw client for the patient search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    search_url: String,
}

impl SearchClient {
    pub fn new(search_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            search_url: search_url.into(),
        })
    }

    pub fn with_timeout(search_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            search_url: search_url.into(),
        })
    }

    /// Fetches the patients whose cédula contains `query`.
    pub async fn by_dni(&self, query: &str) -> ClientResult<Vec<PatientSummary>> {
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("dni", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        tracing::debug!(query, results = parsed.patients.len(), "patient search");
        Ok(parsed.patients)
    }
}

/// Debounced, generation-gated search.
///
/// Every `submit` supersedes the previous one: it bumps the shared
/// generation counter, waits out the debounce window, and only performs
/// (and reports) the request if it is still the newest. `Ok(None)` means
/// the query was superseded while waiting or in flight.
pub struct SearchDriver {
    client: SearchClient,
    generation: AtomicU64,
    debounce: Duration,
}

impl SearchDriver {
    pub fn new(client: SearchClient) -> Self {
        Self::with_debounce(client, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(client: SearchClient, debounce: Duration) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
            debounce,
        }
    }

    /// Current generation; a later `submit` always observes a higher value.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, query: &str) -> ClientResult<Option<Vec<PatientSummary>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(query, "search superseded during debounce");
            return Ok(None);
        }

        let patients = self.client.by_dni(query).await?;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(query, "dropping stale search response");
            return Ok(None);
        }

        Ok(Some(patients))
    }
}
