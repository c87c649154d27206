//! Request body types for API endpoints.

use serde::Deserialize;
use time::Date;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::{PetChanges, UserChanges};
use crate::models::Role;

/// Partial user update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            role: req.role,
        }
    }
}

/// Pet creation request. All three fields are required.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePetRequest {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(alias = "birthDate")]
    pub birth_date: Option<Date>,
}

/// Partial pet update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub specie: Option<String>,
    #[serde(alias = "birthDate")]
    pub birth_date: Option<Date>,
    pub adopted: Option<bool>,
    pub owner: Option<Uuid>,
    pub image: Option<String>,
}

impl From<UpdatePetRequest> for PetChanges {
    fn from(req: UpdatePetRequest) -> Self {
        Self {
            name: req.name,
            specie: req.specie,
            birth_date: req.birth_date,
            adopted: req.adopted,
            owner: req.owner,
            image: req.image,
        }
    }
}
