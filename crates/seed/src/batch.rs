//! Splitting large seed runs into requests the ingestor accepts.

use adoptions::mocking::{IngestOutcome, IngestRequest, IngestionResult, MAX_RECORDS_PER_KIND};

/// Keeps a requested batch size between one and the ingestor's per-kind cap.
pub fn clamp_batch_size(size: usize) -> usize {
    size.clamp(1, MAX_RECORDS_PER_KIND)
}

/// Splits `users` and `pets` into requests of at most `batch_size` of each kind.
///
/// Returns no batches when nothing is requested. A `batch_size` of zero is treated as one.
pub fn plan_batches(users: usize, pets: usize, batch_size: usize) -> Vec<IngestRequest> {
    let size = batch_size.max(1);
    let mut batches = Vec::new();
    let (mut users_left, mut pets_left) = (users, pets);

    while users_left > 0 || pets_left > 0 {
        let request = IngestRequest {
            users: users_left.min(size),
            pets: pets_left.min(size),
        };
        users_left -= request.users;
        pets_left -= request.pets;
        batches.push(request);
    }

    batches
}

/// Adds one batch's results to a running total.
pub fn merge_outcome(total: &mut IngestOutcome, batch: IngestOutcome) {
    merge_result(&mut total.users, batch.users);
    merge_result(&mut total.pets, batch.pets);
}

fn merge_result(total: &mut IngestionResult, batch: IngestionResult) {
    total.inserted += batch.inserted;
    total.errors.extend(batch.errors);
}
