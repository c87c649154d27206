//! Bulk generation and insertion of synthetic records.

use std::fmt;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::generators::{GenerationError, PetGenerator, UserGenerator};
use crate::errors::AppError;
use crate::models::{NewPet, NewUser};

/// Per-kind cap on records inserted by a single ingestion.
pub const MAX_RECORDS_PER_KIND: usize = 100;

/// Storage the ingestor writes to, one record per call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a user and returns the id assigned by storage.
    async fn insert_user(&self, user: NewUser) -> Result<Uuid, AppError>;

    /// Inserts a pet and returns the id assigned by storage.
    async fn insert_pet(&self, pet: NewPet) -> Result<Uuid, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Users,
    Pets,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Users => f.write_str("users"),
            RecordKind::Pets => f.write_str("pets"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Must specify at least one value (users or pets)")]
    NoWorkRequested,
    #[error("Cannot insert more than {limit} {kind} at once")]
    LimitExceeded { kind: RecordKind, limit: usize },
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// How many records of each kind to generate and insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestRequest {
    #[serde(default)]
    pub users: usize,
    #[serde(default)]
    pub pets: usize,
}

/// Insert tally for one record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestionResult {
    pub inserted: usize,
    /// Failure messages in insertion order.
    pub errors: Vec<String>,
}

impl IngestionResult {
    fn record(&mut self, outcome: Result<Uuid, AppError>) {
        match outcome {
            Ok(_) => self.inserted += 1,
            Err(e) => self.errors.push(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestOutcome {
    pub users: IngestionResult,
    pub pets: IngestionResult,
}

/// Generates synthetic users and pets and inserts them one by one.
///
/// A failed insert is recorded and the batch moves on; nothing is retried.
/// Users are always fully processed before pets.
pub struct BulkIngestor<'a, S: ?Sized> {
    store: &'a S,
    users: UserGenerator,
    pets: PetGenerator,
    limit: usize,
}

impl<'a, S: RecordStore + ?Sized> BulkIngestor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            users: UserGenerator::new(),
            pets: PetGenerator::new(),
            limit: MAX_RECORDS_PER_KIND,
        }
    }

    pub fn with_generators(mut self, users: UserGenerator, pets: PetGenerator) -> Self {
        self.users = users;
        self.pets = pets;
        self
    }

    /// Overrides the per-kind cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Validates a request without doing any work.
    pub fn check(&self, request: IngestRequest) -> Result<(), IngestError> {
        if request.users == 0 && request.pets == 0 {
            return Err(IngestError::NoWorkRequested);
        }
        if request.users > self.limit {
            return Err(IngestError::LimitExceeded {
                kind: RecordKind::Users,
                limit: self.limit,
            });
        }
        if request.pets > self.limit {
            return Err(IngestError::LimitExceeded {
                kind: RecordKind::Pets,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Generates and inserts the requested records.
    pub async fn ingest<R: Rng + Send>(
        &self,
        request: IngestRequest,
        rng: &mut R,
    ) -> Result<IngestOutcome, IngestError> {
        self.check(request)?;

        let mut outcome = IngestOutcome::default();

        if request.users > 0 {
            let users = self.users.generate_batch(request.users, rng)?;
            for user in users {
                let result = self.store.insert_user(user.into_new_user()).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Failed to insert generated user");
                }
                outcome.users.record(result);
            }
            info!(
                "Inserted {}/{} users",
                outcome.users.inserted, request.users
            );
        }

        if request.pets > 0 {
            let pets = self.pets.generate_batch(request.pets, rng);
            for pet in pets {
                let result = self.store.insert_pet(pet.into_new_pet()).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Failed to insert generated pet");
                }
                outcome.pets.record(result);
            }
            info!("Inserted {}/{} pets", outcome.pets.inserted, request.pets);
        }

        Ok(outcome)
    }
}
