//! Integration tests against a real PostgreSQL database.
//!
//! To run these tests, you need:
//! 1. A PostgreSQL database (migrations are applied by the tests)
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p adoptions --test database_integration`
//!
//! Every test works on users under a domain unique to that test and removes
//! them afterwards, so a development database is safe to use.

use std::env;

use adoptions::{
    config::AppConfig,
    create_router,
    database::{Database, PetChanges, UserChanges},
    errors::AppError,
    mocking::{
        BulkIngestor, IngestRequest, MOCK_PASSWORD, PetGenerator, RecordStore, UserGenConfig,
        UserGenerator,
    },
    models::{NewPet, NewUser, Role},
};
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};
use time::macros::date;
use tower::ServiceExt;
use uuid::Uuid;

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

fn test_domain() -> String {
    format!("it-{}.test", Uuid::new_v4().simple())
}

fn user_generator(domain: &str) -> UserGenerator {
    UserGenerator::with_config(UserGenConfig {
        email_domains: vec![domain.to_string()],
        ..UserGenConfig::default()
    })
}

/// Removes users under `domain` along with any pets they own.
async fn cleanup_domain(pool: &PgPool, domain: &str) {
    let pattern = format!("%@{domain}");
    let _ = sqlx::query(
        "DELETE FROM pets WHERE owner IN (SELECT id FROM users WHERE email LIKE $1)",
    )
    .bind(&pattern)
    .execute(pool)
    .await;
    let _ = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(&pattern)
        .execute(pool)
        .await;
}

async fn count_domain_users(pool: &PgPool, domain: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email LIKE $1")
        .bind(format!("%@{domain}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count users")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.to_string(),
        password: "not-a-real-hash".to_string(),
        role: Role::User,
        pets: Vec::new(),
    }
}

#[tokio::test]
async fn test_user_crud() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool.clone());
    let domain = test_domain();

    let created = db
        .create_user(&new_user(&format!("grace@{domain}")))
        .await
        .unwrap();
    assert_eq!(created.role, Role::User);
    assert!(created.pets.is_empty());

    let fetched = db.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, created.email);

    let updated = db
        .update_user(
            created.id,
            &UserChanges {
                role: Some(Role::Admin),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.first_name, "Grace");

    assert!(db.delete_user(created.id).await.unwrap());
    assert!(!db.delete_user(created.id).await.unwrap());
    assert!(db.get_user(created.id).await.unwrap().is_none());

    cleanup_domain(&pool, &domain).await;
}

#[tokio::test]
async fn test_pet_crud() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool);

    let pet = db
        .create_pet(&NewPet::new(
            "Biscuit".to_string(),
            "dog".to_string(),
            date!(2020 - 05 - 17),
        ))
        .await
        .unwrap();
    assert!(!pet.adopted);
    assert!(pet.owner.is_none());

    let updated = db
        .update_pet(
            pet.id,
            &PetChanges {
                name: Some("Biscuit II".to_string()),
                ..PetChanges::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Biscuit II");
    assert_eq!(updated.birth_date, Some(date!(2020 - 05 - 17)));

    let deleted = db.delete_pet(pet.id).await.unwrap().unwrap();
    assert_eq!(deleted.id, pet.id);
    assert!(db.delete_pet(pet.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_a_per_record_error() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool.clone());
    let domain = test_domain();
    let email = format!("twice@{domain}");

    db.insert_user(new_user(&email)).await.unwrap();
    let err = db.insert_user(new_user(&email)).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    assert_eq!(count_domain_users(&pool, &domain).await, 1);
    cleanup_domain(&pool, &domain).await;
}

#[tokio::test]
async fn test_bulk_ingest_inserts_requested_records() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool.clone());
    let domain = test_domain();
    let mut rng = StdRng::seed_from_u64(7);

    let before_pets = db.all_pets().await.unwrap().len();

    let outcome = BulkIngestor::new(&db)
        .with_generators(user_generator(&domain), PetGenerator::new())
        .ingest(IngestRequest { users: 3, pets: 2 }, &mut rng)
        .await
        .unwrap();

    assert_eq!(outcome.users.inserted + outcome.users.errors.len(), 3);
    assert_eq!(outcome.pets.inserted, 2);
    assert!(outcome.pets.errors.is_empty());

    assert_eq!(
        count_domain_users(&pool, &domain).await,
        outcome.users.inserted as i64
    );
    assert!(db.all_pets().await.unwrap().len() >= before_pets + 2);

    cleanup_domain(&pool, &domain).await;
}

#[tokio::test]
async fn test_mock_user_can_log_in() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let db = Database::new(pool.clone());
    let domain = test_domain();
    let mut rng = StdRng::seed_from_u64(11);

    let user = user_generator(&domain)
        .generate_batch(1, &mut rng)
        .unwrap()
        .remove(0);
    let email = user.email.clone();
    db.create_user(&user.into_new_user()).await.unwrap();

    let app = create_router(pool.clone(), AppConfig::default()).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/sessions/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": email, "password": MOCK_PASSWORD}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("coderCookie="));

    let response = app
        .oneshot(
            Request::get("/api/sessions/current")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["payload"]["email"], email.as_str());

    cleanup_domain(&pool, &domain).await;
}

#[tokio::test]
async fn test_create_pet_over_http() {
    let Some(pool) = get_test_pool().await else {
        return;
    };
    let app = create_router(pool.clone(), AppConfig::default()).unwrap();

    let response = app
        .oneshot(
            Request::post("/api/pets")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"name": "Pepper", "specie": "cat", "birthDate": "2021-03-04"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Pet created successfully");
    assert_eq!(body["payload"]["name"], "Pepper");
    assert_eq!(body["payload"]["adopted"], false);

    let id: Uuid = serde_json::from_value(body["payload"]["id"].clone()).unwrap();
    Database::new(pool).delete_pet(id).await.unwrap();
}
