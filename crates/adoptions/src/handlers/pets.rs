//! Pet management handlers.

use axum::{
    Extension,
    extract::{Path, rejection::JsonRejection},
    response::Json,
};
use tracing::info;

use super::parse_id;
use crate::{
    database::Database,
    errors::AppError,
    models::{NewPet, Pet},
    types::{
        CreatePetRequest, PayloadResponse, PetCreatedResponse, PetDeletedResponse,
        PetUpdatedResponse, SUCCESS, UpdatePetRequest,
    },
};

/// Get all pets.
#[utoipa::path(
    get,
    path = "/api/pets",
    tag = "pets",
    responses(
        (status = 200, description = "List of all pets", body = Vec<Pet>)
    )
)]
pub async fn list_pets(
    Extension(db): Extension<Database>,
) -> Result<Json<PayloadResponse<Vec<Pet>>>, AppError> {
    let pets = db.all_pets().await?;
    Ok(Json(PayloadResponse::success(pets)))
}

/// Create a pet from a name, species, and birth date.
#[utoipa::path(
    post,
    path = "/api/pets",
    tag = "pets",
    request_body = CreatePetRequest,
    responses(
        (status = 200, description = "Pet created", body = PetCreatedResponse),
        (status = 400, description = "Incomplete values")
    )
)]
pub async fn create_pet(
    Extension(db): Extension<Database>,
    body: Result<Json<CreatePetRequest>, JsonRejection>,
) -> Result<Json<PetCreatedResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let (Some(name), Some(specie), Some(birth_date)) = (req.name, req.specie, req.birth_date)
    else {
        return Err(AppError::InvalidInput("Incomplete values".to_string()));
    };
    if name.trim().is_empty() || specie.trim().is_empty() {
        return Err(AppError::InvalidInput("Incomplete values".to_string()));
    }

    let pet = db.create_pet(&NewPet::new(name, specie, birth_date)).await?;

    info!(pet_id = %pet.id, "Created pet");
    Ok(Json(PetCreatedResponse {
        status: SUCCESS,
        message: "Pet created successfully",
        payload: pet,
    }))
}

/// Get a pet by id.
#[utoipa::path(
    get,
    path = "/api/pets/{pid}",
    tag = "pets",
    params(("pid" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "The pet", body = Pet),
        (status = 400, description = "Invalid pet ID format"),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn get_pet(
    Extension(db): Extension<Database>,
    Path(pid): Path<String>,
) -> Result<Json<PayloadResponse<Pet>>, AppError> {
    let id = parse_id(&pid, "Pet")?;
    let pet = db
        .get_pet(id)
        .await?
        .ok_or(AppError::NotFound("Pet not found"))?;
    Ok(Json(PayloadResponse::success(pet)))
}

/// Update a pet.
#[utoipa::path(
    put,
    path = "/api/pets/{pid}",
    tag = "pets",
    params(("pid" = String, Path, description = "Pet id")),
    request_body = UpdatePetRequest,
    responses(
        (status = 200, description = "Pet updated", body = PetUpdatedResponse),
        (status = 400, description = "Invalid pet ID format or body"),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn update_pet(
    Extension(db): Extension<Database>,
    Path(pid): Path<String>,
    body: Result<Json<UpdatePetRequest>, JsonRejection>,
) -> Result<Json<PetUpdatedResponse>, AppError> {
    let id = parse_id(&pid, "Pet")?;
    let Json(req) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    db.update_pet(id, &req.into())
        .await?
        .ok_or(AppError::NotFound("Pet not found"))?;

    info!(pet_id = %id, "Updated pet");
    Ok(Json(PetUpdatedResponse {
        status: SUCCESS,
        message: "Pet updated successfully",
        pet_id: id,
    }))
}

/// Delete a pet, returning the removed record.
#[utoipa::path(
    delete,
    path = "/api/pets/{pid}",
    tag = "pets",
    params(("pid" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet deleted", body = PetDeletedResponse),
        (status = 400, description = "Invalid pet ID format"),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn delete_pet(
    Extension(db): Extension<Database>,
    Path(pid): Path<String>,
) -> Result<Json<PetDeletedResponse>, AppError> {
    let id = parse_id(&pid, "Pet")?;
    let deleted_pet = db
        .delete_pet(id)
        .await?
        .ok_or(AppError::NotFound("Pet not found"))?;

    info!(pet_id = %id, "Deleted pet");
    Ok(Json(PetDeletedResponse {
        status: SUCCESS,
        message: "Pet deleted successfully",
        pet_id: id,
        deleted_pet,
    }))
}
