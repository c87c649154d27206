use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A stored user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User fields supplied on insert; id and timestamps are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub specie: String,
    pub birth_date: Option<Date>,
    pub adopted: bool,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Pet fields supplied on insert; id and timestamps are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub specie: String,
    pub birth_date: Option<Date>,
    pub adopted: bool,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
}

impl NewPet {
    pub fn new(name: String, specie: String, birth_date: Date) -> Self {
        Self {
            name,
            specie,
            birth_date: Some(birth_date),
            adopted: false,
            owner: None,
            image: None,
        }
    }
}
