//! Synthetic data for seeding the database.
//!
//! - [`generators`]: random users and pets ([`UserGenerator`], [`PetGenerator`])
//! - [`ingest`]: the [`BulkIngestor`] that generates and inserts records one at a time
//! - [`report`]: the response payload summarizing an ingestion run

pub mod generators;
pub mod ingest;
pub mod report;

pub use generators::{
    GenerationError, MOCK_PASSWORD, PetGenConfig, PetGenerator, Species, SyntheticPet,
    SyntheticUser, UserGenConfig, UserGenerator,
};
pub use ingest::{
    BulkIngestor, IngestError, IngestOutcome, IngestRequest, IngestionResult,
    MAX_RECORDS_PER_KIND, RecordKind, RecordStore,
};
pub use report::{IngestReport, VerifyHints, build_report};
