//! Seeding tools for the adoptions backend.
//!
//! Two ways to fill a database with mock users and pets:
//!
//! - [`db::Seeder`] runs the ingestor directly against PostgreSQL
//! - [`api::ApiSeeder`] drives a running server's `generateData` endpoint
//!
//! Both split large runs into batches the ingestor accepts.
//!
//! ```rust,ignore
//! use adoptions::database::Database;
//! use seed::prelude::*;
//!
//! let outcome = Seeder::new(Database::new(pool))
//!     .seed(250, 400, &mut rng)
//!     .await?;
//! ```

pub mod api;
pub mod batch;
pub mod config;
pub mod db;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::api::{ApiError, ApiSeeder};
    pub use crate::batch::{clamp_batch_size, merge_outcome, plan_batches};
    pub use crate::config::{ApiArgs, CountArgs, DbArgs, SeedArgs, SeedCommand};
    pub use crate::db::{SeedError, Seeder};
}
