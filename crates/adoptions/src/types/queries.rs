//! Query parameter types for API endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Default number of users returned by the mock preview.
pub const DEFAULT_MOCK_USERS: usize = 50;
/// Upper bound for the mock user preview.
pub const MAX_MOCK_USERS: usize = 500;
/// Default number of pets returned by the mock preview.
pub const DEFAULT_MOCK_PETS: usize = 100;
/// Upper bound for the mock pet preview.
pub const MAX_MOCK_PETS: usize = 1000;

/// Mock preview query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountQuery {
    /// Number of records to generate; the endpoint default applies when absent.
    pub count: Option<usize>,
}
