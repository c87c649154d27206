//! HTTP request handlers for the adoptions API.
//!
//! Session handlers live in [`crate::auth`]; everything else is grouped here by resource.

pub mod mocks;
pub mod pets;
pub mod stats;
pub mod users;

use uuid::Uuid;

use crate::errors::AppError;

pub use mocks::{generate_data, mock_pets, mock_users};
pub use pets::{create_pet, delete_pet, get_pet, list_pets, update_pet};
pub use stats::{health_check, index};
pub use users::{delete_user, get_user, list_users, update_user};

/// Parses a path id, naming the resource ("User", "Pet") in the error.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput(format!("{resource} ID is required")));
    }
    Uuid::parse_str(raw).map_err(|_| {
        AppError::InvalidInput(format!("Invalid {} ID format", resource.to_lowercase()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "User").unwrap(), id);

        let err = parse_id("64f1c2", "Pet").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid pet ID format");

        let err = parse_id("  ", "User").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: User ID is required");
    }
}
