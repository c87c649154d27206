//! Response types for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::mocking::{SyntheticPet, SyntheticUser};
use crate::models::Pet;

pub const SUCCESS: &str = "success";

/// `{status, payload}` envelope.
#[derive(Debug, Serialize)]
pub struct PayloadResponse<T> {
    pub status: &'static str,
    pub payload: T,
}

impl<T> PayloadResponse<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: SUCCESS,
            payload,
        }
    }
}

/// `{status, message}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn success(message: &'static str) -> Self {
        Self {
            status: SUCCESS,
            message,
        }
    }
}

/// Pet creation response carrying the stored pet.
#[derive(Debug, Serialize, ToSchema)]
pub struct PetCreatedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub payload: Pet,
}

/// Pet update response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PetUpdatedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub pet_id: Uuid,
}

/// Pet deletion response, echoing the removed pet.
#[derive(Debug, Serialize, ToSchema)]
pub struct PetDeletedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub pet_id: Uuid,
    pub deleted_pet: Pet,
}

/// Mock user preview.
#[derive(Debug, Serialize, ToSchema)]
pub struct MockUsersResponse {
    pub status: &'static str,
    pub payload: Vec<SyntheticUser>,
    pub count: usize,
    pub environment: String,
    pub note: String,
}

/// Mock pet preview.
#[derive(Debug, Serialize, ToSchema)]
pub struct MockPetsResponse {
    pub status: &'static str,
    pub payload: Vec<SyntheticPet>,
    pub count: usize,
    pub environment: String,
}

/// Service health.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub timestamp: String,
    /// "connected" or "disconnected".
    pub database: &'static str,
}
