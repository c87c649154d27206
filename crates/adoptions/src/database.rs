use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::errors::AppError;
use crate::mocking::RecordStore;
use crate::models::{NewPet, NewUser, Pet, Role, User};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password, role, pets, created_at, updated_at";
const PET_COLUMNS: &str =
    "id, name, specie, birth_date, adopted, owner, image, created_at, updated_at";

/// Partial user update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Partial pet update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct PetChanges {
    pub name: Option<String>,
    pub specie: Option<String>,
    pub birth_date: Option<Date>,
    pub adopted: Option<bool>,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns true when a round trip to the database succeeds.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    // Users

    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password, role, pets)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role)
        .bind(&user.pets)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn all_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Applies `changes` and returns the updated row, or `None` if the user is gone.
    pub async fn update_user(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                role = COALESCE($5, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(changes.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Pets

    pub async fn create_pet(&self, pet: &NewPet) -> Result<Pet, AppError> {
        let created = sqlx::query_as(&format!(
            r#"
            INSERT INTO pets (name, specie, birth_date, adopted, owner, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(&pet.name)
        .bind(&pet.specie)
        .bind(pet.birth_date)
        .bind(pet.adopted)
        .bind(pet.owner)
        .bind(&pet.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn all_pets(&self) -> Result<Vec<Pet>, AppError> {
        let pets = sqlx::query_as(&format!(
            "SELECT {PET_COLUMNS} FROM pets ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(pets)
    }

    pub async fn get_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pet)
    }

    pub async fn update_pet(&self, id: Uuid, changes: &PetChanges) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as(&format!(
            r#"
            UPDATE pets SET
                name = COALESCE($2, name),
                specie = COALESCE($3, specie),
                birth_date = COALESCE($4, birth_date),
                adopted = COALESCE($5, adopted),
                owner = COALESCE($6, owner),
                image = COALESCE($7, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.specie)
        .bind(changes.birth_date)
        .bind(changes.adopted)
        .bind(changes.owner)
        .bind(&changes.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }

    /// Deletes a pet and returns the removed row.
    pub async fn delete_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as(&format!(
            "DELETE FROM pets WHERE id = $1 RETURNING {PET_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn insert_user(&self, user: NewUser) -> Result<Uuid, AppError> {
        Ok(self.create_user(&user).await?.id)
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Uuid, AppError> {
        Ok(self.create_pet(&pet).await?.id)
    }
}
