pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod mocking;
pub mod models;
pub mod request_id;
pub mod types;

use axum::{
    Extension, Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::{SessionKeys, current, login, logout, register, unprotected_current, unprotected_login},
    config::{AppConfig, ConfigError},
    database::Database,
    handlers::{
        create_pet, delete_pet, delete_user, generate_data, get_pet, get_user, health_check,
        index, list_pets, list_users, mock_pets, mock_users, update_pet, update_user,
    },
    request_id::request_id_middleware,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Adoptions API", description = "Users, pets, sessions, and mock data generation"),
    paths(
        handlers::stats::health_check,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::pets::list_pets,
        handlers::pets::create_pet,
        handlers::pets::get_pet,
        handlers::pets::update_pet,
        handlers::pets::delete_pet,
        handlers::mocks::mock_users,
        handlers::mocks::mock_pets,
        handlers::mocks::generate_data,
        auth::register,
        auth::login,
        auth::current,
        auth::logout,
        auth::unprotected_login,
        auth::unprotected_current,
    ),
    components(schemas(
        models::Role,
        models::User,
        models::Pet,
        mocking::Species,
        mocking::SyntheticUser,
        mocking::SyntheticPet,
        mocking::IngestRequest,
        mocking::IngestionResult,
        mocking::IngestOutcome,
        mocking::IngestReport,
        mocking::VerifyHints,
        auth::TokenUser,
        auth::UserProfile,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::RegisterResponse,
        auth::LoginResponse,
        types::UpdateUserRequest,
        types::CreatePetRequest,
        types::UpdatePetRequest,
        types::MessageResponse,
        types::PetCreatedResponse,
        types::PetUpdatedResponse,
        types::PetDeletedResponse,
        types::MockUsersResponse,
        types::MockPetsResponse,
        types::HealthResponse,
    )),
    tags(
        (name = "users", description = "User management"),
        (name = "pets", description = "Pet management"),
        (name = "sessions", description = "Registration and login"),
        (name = "mocks", description = "Mock data generation"),
        (name = "stats", description = "Service status"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the application router.
///
/// Fails only if the configured cookie secret cannot produce a signing key.
pub fn create_router(pool: PgPool, config: AppConfig) -> Result<Router, ConfigError> {
    let db = Database::new(pool);
    let keys = SessionKeys::from_config(&config)?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        // User routes
        .route("/api/users", get(list_users))
        .route(
            "/api/users/{uid}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Pet routes
        .route("/api/pets", get(list_pets).post(create_pet))
        .route(
            "/api/pets/{pid}",
            get(get_pet).put(update_pet).delete(delete_pet),
        )
        // Session routes
        .route("/api/sessions/register", post(register))
        .route("/api/sessions/login", post(login))
        .route("/api/sessions/current", get(current))
        .route("/api/sessions/logout", get(logout))
        .route("/api/sessions/unprotectedLogin", post(unprotected_login))
        .route("/api/sessions/unprotectedCurrent", get(unprotected_current))
        // Mocking routes
        .route("/api/mocks/mockingusers", get(mock_users))
        .route("/api/mocks/mockingpets", get(mock_pets))
        .route("/api/mocks/generateData", post(generate_data))
        .layer(Extension(db))
        .layer(Extension(config))
        .layer(Extension(keys))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    Ok(router)
}

pub async fn run_server(pool: PgPool, config: AppConfig) -> anyhow::Result<()> {
    let port = config.port;
    let app = create_router(pool, config)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
