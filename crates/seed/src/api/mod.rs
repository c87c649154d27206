//! API-based seeding.
//!
//! Drives a running server's `generateData` endpoint so records go through
//! the same handler path as any other client.

use adoptions::mocking::{IngestOutcome, IngestReport, IngestRequest};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::batch::{clamp_batch_size, merge_outcome, plan_batches};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Backend not reachable at {0}")]
    BackendNotReachable(String),
    /// A later batch failed; `completed` holds what earlier batches inserted.
    #[error(
        "Seeding stopped after {} users and {} pets were inserted: {source}",
        .completed.users.inserted,
        .completed.pets.inserted
    )]
    Interrupted {
        completed: IngestOutcome,
        source: Box<ApiError>,
    },
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// List envelope; only the length matters here.
#[derive(Debug, Deserialize)]
struct ListBody {
    payload: Vec<Value>,
}

/// Seeds a running server over HTTP.
pub struct ApiSeeder {
    client: Client,
    base_url: String,
}

impl ApiSeeder {
    /// Creates a new API seeder for the given backend URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Checks if the backend is reachable.
    pub async fn check_health(&self) -> Result<(), ApiError> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(ApiError::BackendNotReachable(format!(
                "{url} (health check returned status {})",
                resp.status()
            ))),
            Err(e) => Err(ApiError::BackendNotReachable(format!("{url} ({e})"))),
        }
    }

    /// Asks the server to generate and insert one batch.
    pub async fn generate_data(&self, users: usize, pets: usize) -> Result<IngestReport, ApiError> {
        let url = format!("{}/api/mocks/generateData", self.base_url);
        debug!(users, pets, "Requesting generated data");

        let resp = self
            .client
            .post(&url)
            .json(&IngestRequest { users, pets })
            .send()
            .await?;

        Ok(success_body(resp).await?.json().await?)
    }

    /// Seeds any number of records, one server request per batch.
    ///
    /// `batch_size` is capped at the server's per-kind limit. If a batch fails
    /// after others went through, the error carries what was already inserted.
    pub async fn seed(
        &self,
        users: usize,
        pets: usize,
        batch_size: usize,
    ) -> Result<IngestOutcome, ApiError> {
        let batches = plan_batches(users, pets, clamp_batch_size(batch_size));
        if batches.is_empty() {
            // The server rejects an empty request with its own message.
            return self.generate_data(0, 0).await.map(|report| report.results);
        }

        let mut total = IngestOutcome::default();
        let batch_count = batches.len();
        for (i, request) in batches.into_iter().enumerate() {
            let report = match self.generate_data(request.users, request.pets).await {
                Ok(report) => report,
                Err(e) if i == 0 => return Err(e),
                Err(e) => {
                    warn!(
                        "Batch {}/{} failed after {} users and {} pets were inserted",
                        i + 1,
                        batch_count,
                        total.users.inserted,
                        total.pets.inserted
                    );
                    return Err(ApiError::Interrupted {
                        completed: total,
                        source: Box::new(e),
                    });
                }
            };
            info!(
                "{}: {} users, {} pets inserted",
                report.message, report.results.users.inserted, report.results.pets.inserted
            );
            merge_outcome(&mut total, report.results);
        }
        Ok(total)
    }

    /// Number of users the server currently lists.
    pub async fn count_users(&self) -> Result<usize, ApiError> {
        self.count("/api/users").await
    }

    /// Number of pets the server currently lists.
    pub async fn count_pets(&self) -> Result<usize, ApiError> {
        self.count("/api/pets").await
    }

    async fn count(&self, path: &str) -> Result<usize, ApiError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        let body: ListBody = success_body(resp).await?.json().await?;
        Ok(body.payload.len())
    }
}

/// Passes successful responses through; turns anything else into [`ApiError::Rejected`].
async fn success_body(resp: Response) -> Result<Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => format!("Status {status}: {text}"),
    };
    Err(ApiError::Rejected(message))
}
