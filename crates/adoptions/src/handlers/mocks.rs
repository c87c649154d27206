//! Mock data endpoints: previews and bulk insertion.

use axum::{
    Extension,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    config::AppConfig,
    database::Database,
    errors::AppError,
    mocking::{
        BulkIngestor, IngestReport, IngestRequest, MOCK_PASSWORD, PetGenerator, UserGenerator,
        build_report,
    },
    types::{
        CountQuery, DEFAULT_MOCK_PETS, DEFAULT_MOCK_USERS, MAX_MOCK_PETS, MAX_MOCK_USERS,
        MockPetsResponse, MockUsersResponse, SUCCESS,
    },
};

/// Resolves the requested count against the endpoint's default and cap.
fn resolve_count(
    query: Result<Query<CountQuery>, QueryRejection>,
    default: usize,
    max: usize,
    what: &str,
) -> Result<usize, AppError> {
    let Query(query) = query.map_err(|_| {
        AppError::InvalidInput("count must be a non-negative integer".to_string())
    })?;
    let count = query.count.unwrap_or(default);
    if count > max {
        return Err(AppError::InvalidInput(format!(
            "Cannot generate more than {max} {what}"
        )));
    }
    Ok(count)
}

/// Generate mock users without storing them.
#[utoipa::path(
    get,
    path = "/api/mocks/mockingusers",
    tag = "mocks",
    params(CountQuery),
    responses(
        (status = 200, description = "Generated users", body = MockUsersResponse),
        (status = 400, description = "Count is malformed or above 500")
    )
)]
pub async fn mock_users(
    Extension(config): Extension<AppConfig>,
    query: Result<Query<CountQuery>, QueryRejection>,
) -> Result<Json<MockUsersResponse>, AppError> {
    let count = resolve_count(query, DEFAULT_MOCK_USERS, MAX_MOCK_USERS, "users")?;

    let mut rng = StdRng::from_entropy();
    let users = UserGenerator::new().generate_batch(count, &mut rng)?;

    Ok(Json(MockUsersResponse {
        status: SUCCESS,
        count: users.len(),
        payload: users,
        environment: config.environment,
        note: format!("All users have encrypted password \"{MOCK_PASSWORD}\""),
    }))
}

/// Generate mock pets without storing them.
#[utoipa::path(
    get,
    path = "/api/mocks/mockingpets",
    tag = "mocks",
    params(CountQuery),
    responses(
        (status = 200, description = "Generated pets", body = MockPetsResponse),
        (status = 400, description = "Count is malformed or above 1000")
    )
)]
pub async fn mock_pets(
    Extension(config): Extension<AppConfig>,
    query: Result<Query<CountQuery>, QueryRejection>,
) -> Result<Json<MockPetsResponse>, AppError> {
    let count = resolve_count(query, DEFAULT_MOCK_PETS, MAX_MOCK_PETS, "pets")?;

    let mut rng = StdRng::from_entropy();
    let pets = PetGenerator::new().generate_batch(count, &mut rng);

    Ok(Json(MockPetsResponse {
        status: SUCCESS,
        count: pets.len(),
        payload: pets,
        environment: config.environment,
    }))
}

/// Generate users and pets and insert them into the database.
#[utoipa::path(
    post,
    path = "/api/mocks/generateData",
    tag = "mocks",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Per-kind insert counts and errors", body = IngestReport),
        (status = 400, description = "Nothing requested, a count above 100, or a malformed body")
    )
)]
pub async fn generate_data(
    Extension(db): Extension<Database>,
    Extension(config): Extension<AppConfig>,
    body: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<IngestReport>, AppError> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    info!(
        users = request.users,
        pets = request.pets,
        "Generating mock data"
    );

    let mut rng = StdRng::from_entropy();
    let outcome = BulkIngestor::new(&db).ingest(request, &mut rng).await?;

    Ok(Json(build_report(outcome, &config.environment)))
}
