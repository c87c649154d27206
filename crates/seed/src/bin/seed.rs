//! Seed the adoptions backend with mock users and pets.
//!
//! Run with:
//! ```
//! cargo run -p seed --bin seed -- db --users 50 --pets 100 --seed 12345
//! cargo run -p seed --bin seed -- api --users 10 --pets 20 --base-url http://localhost:8080
//! ```

use adoptions::{database::Database, mocking::IngestOutcome};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use seed::prelude::*;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = SeedArgs::parse();

    let outcome = match args.command {
        SeedCommand::Db(db_args) => seed_database(db_args).await?,
        SeedCommand::Api(api_args) => seed_api(api_args).await?,
    };

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!(
        "  Users: {} inserted, {} failed",
        outcome.users.inserted,
        outcome.users.errors.len()
    );
    tracing::info!(
        "  Pets: {} inserted, {} failed",
        outcome.pets.inserted,
        outcome.pets.errors.len()
    );
    for error in outcome.users.errors.iter().chain(&outcome.pets.errors) {
        tracing::warn!("  {error}");
    }

    Ok(())
}

async fn seed_database(args: DbArgs) -> anyhow::Result<IngestOutcome> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    sqlx::migrate!("../adoptions/migrations").run(&pool).await?;

    tracing::info!("Connected to database");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let outcome = Seeder::new(Database::new(pool))
        .with_batch_size(args.counts.batch_size)
        .seed(args.counts.users, args.counts.pets, &mut rng)
        .await?;

    Ok(outcome)
}

async fn seed_api(args: ApiArgs) -> anyhow::Result<IngestOutcome> {
    let seeder = ApiSeeder::new(&args.base_url);
    seeder.check_health().await?;

    tracing::info!("Backend reachable at {}", args.base_url);

    let outcome = seeder
        .seed(args.counts.users, args.counts.pets, args.counts.batch_size)
        .await?;

    tracing::info!(
        "Server now lists {} users and {} pets",
        seeder.count_users().await?,
        seeder.count_pets().await?
    );

    Ok(outcome)
}
