//! Batched seeding through a record store.

use adoptions::mocking::{
    BulkIngestor, IngestError, IngestOutcome, MAX_RECORDS_PER_KIND, RecordStore,
};
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::batch::{clamp_batch_size, merge_outcome, plan_batches};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// A later batch failed; `completed` holds what earlier batches stored.
    #[error(
        "Seeding stopped after {} users and {} pets were inserted: {source}",
        .completed.users.inserted,
        .completed.pets.inserted
    )]
    Interrupted {
        completed: IngestOutcome,
        source: IngestError,
    },
}

/// Seeds any [`RecordStore`] in batches no larger than the ingestor accepts.
pub struct Seeder<S> {
    store: S,
    batch_size: usize,
}

impl<S: RecordStore> Seeder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            batch_size: MAX_RECORDS_PER_KIND,
        }
    }

    /// Sets the records of each kind per batch, capped at the ingestor's limit.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = clamp_batch_size(size);
        self
    }

    /// Generates and inserts `users` and `pets`, returning the combined tallies.
    ///
    /// Failed inserts are counted, not fatal. Asking for nothing is an error.
    pub async fn seed<R: Rng + Send>(
        &self,
        users: usize,
        pets: usize,
        rng: &mut R,
    ) -> Result<IngestOutcome, SeedError> {
        let batches = plan_batches(users, pets, self.batch_size);
        if batches.is_empty() {
            return Err(IngestError::NoWorkRequested.into());
        }

        let ingestor = BulkIngestor::new(&self.store);
        let mut total = IngestOutcome::default();
        let batch_count = batches.len();

        for (i, request) in batches.into_iter().enumerate() {
            let outcome = match ingestor.ingest(request, rng).await {
                Ok(outcome) => outcome,
                Err(source) if i == 0 => return Err(source.into()),
                Err(source) => {
                    warn!(
                        "Batch {}/{} failed after {} users and {} pets were inserted",
                        i + 1,
                        batch_count,
                        total.users.inserted,
                        total.pets.inserted
                    );
                    return Err(SeedError::Interrupted {
                        completed: total,
                        source,
                    });
                }
            };
            info!(
                "Batch {}/{}: {} users, {} pets inserted",
                i + 1,
                batch_count,
                outcome.users.inserted,
                outcome.pets.inserted
            );
            merge_outcome(&mut total, outcome);
        }

        info!(
            "Seeded {} users ({} failed) and {} pets ({} failed)",
            total.users.inserted,
            total.users.errors.len(),
            total.pets.inserted,
            total.pets.errors.len()
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use adoptions::{
        errors::AppError,
        models::{NewPet, NewUser},
    };
    use async_trait::async_trait;
    use rand::{SeedableRng, rngs::StdRng};
    use uuid::Uuid;

    use super::*;

    /// Counts inserts; fails every nth pet when `fail_every_nth_pet` is set.
    #[derive(Default)]
    struct CountingStore {
        users: AtomicUsize,
        pets: AtomicUsize,
        fail_every_nth_pet: Option<usize>,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn insert_user(&self, _user: NewUser) -> Result<Uuid, AppError> {
            self.users.fetch_add(1, Ordering::SeqCst);
            Ok(Uuid::new_v4())
        }

        async fn insert_pet(&self, _pet: NewPet) -> Result<Uuid, AppError> {
            let n = self.pets.fetch_add(1, Ordering::SeqCst) + 1;
            match self.fail_every_nth_pet {
                Some(every) if n % every == 0 => {
                    Err(AppError::InvalidInput(format!("pet {n} rejected")))
                }
                _ => Ok(Uuid::new_v4()),
            }
        }
    }

    #[tokio::test]
    async fn test_seed_spans_batches() {
        let seeder = Seeder::new(CountingStore::default()).with_batch_size(2);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = seeder.seed(5, 3, &mut rng).await.unwrap();

        assert_eq!(outcome.users.inserted, 5);
        assert_eq!(outcome.pets.inserted, 3);
        assert_eq!(seeder.store.users.load(Ordering::SeqCst), 5);
        assert_eq!(seeder.store.pets.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_seed_collects_failures_across_batches() {
        let store = CountingStore {
            fail_every_nth_pet: Some(2),
            ..CountingStore::default()
        };
        let seeder = Seeder::new(store).with_batch_size(3);
        let mut rng = StdRng::seed_from_u64(2);

        let outcome = seeder.seed(0, 6, &mut rng).await.unwrap();

        assert_eq!(outcome.pets.inserted, 3);
        assert_eq!(
            outcome.pets.errors,
            vec![
                "Invalid input: pet 2 rejected",
                "Invalid input: pet 4 rejected",
                "Invalid input: pet 6 rejected",
            ]
        );
    }

    #[tokio::test]
    async fn test_seed_requires_work() {
        let seeder = Seeder::new(CountingStore::default());
        let mut rng = StdRng::seed_from_u64(3);

        let err = seeder.seed(0, 0, &mut rng).await.unwrap_err();
        assert!(matches!(err, SeedError::Ingest(IngestError::NoWorkRequested)));
    }

    #[test]
    fn test_interrupted_error_reports_completed_batches() {
        let mut completed = IngestOutcome::default();
        completed.users.inserted = 100;
        completed.pets.inserted = 40;
        let err = SeedError::Interrupted {
            completed,
            source: IngestError::NoWorkRequested,
        };

        assert_eq!(
            err.to_string(),
            "Seeding stopped after 100 users and 40 pets were inserted: \
             Must specify at least one value (users or pets)"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_batch_size_is_capped() {
        let seeder = Seeder::new(CountingStore::default()).with_batch_size(1000);
        assert_eq!(seeder.batch_size, MAX_RECORDS_PER_KIND);
    }
}
