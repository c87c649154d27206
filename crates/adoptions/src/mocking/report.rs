//! Response payload for a bulk ingestion run.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ingest::IngestOutcome;

pub const REPORT_MESSAGE: &str = "Data generated and inserted successfully";

/// Where a client can look to confirm the inserted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifyHints {
    pub users: String,
    pub pets: String,
}

impl Default for VerifyHints {
    fn default() -> Self {
        Self {
            users: "GET /api/users".to_string(),
            pets: "GET /api/pets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestReport {
    pub status: String,
    pub message: String,
    pub environment: String,
    pub results: IngestOutcome,
    pub verify: VerifyHints,
}

/// Wraps an ingestion outcome in the response envelope.
pub fn build_report(results: IngestOutcome, environment: &str) -> IngestReport {
    IngestReport {
        status: "success".to_string(),
        message: REPORT_MESSAGE.to_string(),
        environment: environment.to_string(),
        results,
        verify: VerifyHints::default(),
    }
}
