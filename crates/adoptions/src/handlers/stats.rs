//! Health check and landing page handlers.

use axum::{
    Extension,
    response::{Html, Json},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{config::AppConfig, database::Database, types::HealthResponse};

/// Health check endpoint. Always answers 200; `database` reports connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "stats",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
pub async fn health_check(
    Extension(db): Extension<Database>,
    Extension(config): Extension<AppConfig>,
) -> Json<HealthResponse> {
    let database = if db.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "OK",
        environment: config.environment,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        database,
    })
}

/// Landing page listing the main endpoints.
pub async fn index(Extension(config): Extension<AppConfig>) -> Html<String> {
    Html(format!(
        r#"<h1>Adoptions API</h1>
<p><strong>Environment:</strong> {environment}</p>
<h2>Mocking</h2>
<ul>
  <li><a href="/api/mocks/mockingpets">GET /api/mocks/mockingpets</a> - generate mock pets</li>
  <li><a href="/api/mocks/mockingusers">GET /api/mocks/mockingusers</a> - generate 50 mock users</li>
  <li>POST /api/mocks/generateData - insert generated users and pets</li>
</ul>
<h2>Resources</h2>
<ul>
  <li><a href="/api/users">GET /api/users</a> - list users</li>
  <li><a href="/api/pets">GET /api/pets</a> - list pets</li>
  <li><a href="/health">GET /health</a> - service status</li>
  <li><a href="/api-docs/openapi.json">GET /api-docs/openapi.json</a> - OpenAPI document</li>
</ul>
"#,
        environment = config.environment
    ))
}
