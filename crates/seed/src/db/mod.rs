//! Direct database seeding.
//!
//! The [`Seeder`] drives the adoptions [`BulkIngestor`](adoptions::mocking::BulkIngestor)
//! over as many batches as a run needs.

mod seeder;

pub use seeder::{SeedError, Seeder};
