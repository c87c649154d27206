//! User management handlers.

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
    models::User,
    types::{MessageResponse, PayloadResponse, UpdateUserRequest},
};

/// Get all users.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "List of all users", body = Vec<User>)
    )
)]
pub async fn list_users(
    Extension(db): Extension<Database>,
) -> Result<Json<PayloadResponse<Vec<User>>>, AppError> {
    let users = db.all_users().await?;
    Ok(Json(PayloadResponse::success(users)))
}

/// Get a user by id.
#[utoipa::path(
    get,
    path = "/api/users/{uid}",
    tag = "users",
    params(("uid" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Invalid user ID format"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(db): Extension<Database>,
    Path(uid): Path<String>,
) -> Result<Json<PayloadResponse<User>>, AppError> {
    let id = parse_id(&uid, "User")?;
    let user = db
        .get_user(id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    Ok(Json(PayloadResponse::success(user)))
}

/// Update a user's profile fields.
#[utoipa::path(
    put,
    path = "/api/users/{uid}",
    tag = "users",
    params(("uid" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Invalid user ID format or body"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(db): Extension<Database>,
    Path(uid): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&uid, "User")?;
    let Json(req) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    db.update_user(id, &req.into())
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    info!(user_id = %id, "Updated user");
    Ok(Json(MessageResponse::success("User updated")))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{uid}",
    tag = "users",
    params(("uid" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid user ID format"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(db): Extension<Database>,
    Path(uid): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&uid, "User")?;

    if !db.delete_user(id).await? {
        return Err(AppError::NotFound("User not found"));
    }

    info!(user_id = %id, "Deleted user");
    Ok(Json(MessageResponse::success("User deleted")))
}
