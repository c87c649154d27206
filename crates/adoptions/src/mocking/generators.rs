//! Random user and pet generation.

use fake::{
    Fake,
    faker::name::en::{FirstName, LastName},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime};
use utoipa::ToSchema;
use uuid::{Builder, Uuid};

use crate::auth::hash_password;
use crate::models::{NewPet, NewUser, Role};

/// Plaintext password shared by every generated user.
pub const MOCK_PASSWORD: &str = "coder123";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Hamster,
    Bird,
    Fish,
    Turtle,
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Dog,
        Species::Cat,
        Species::Rabbit,
        Species::Hamster,
        Species::Bird,
        Species::Fish,
        Species::Turtle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Rabbit => "rabbit",
            Species::Hamster => "hamster",
            Species::Bird => "bird",
            Species::Fish => "fish",
            Species::Turtle => "turtle",
        }
    }
}

/// Generated user, shaped like a stored one (including the password hash).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyntheticUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub pets: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SyntheticUser {
    /// Drops the generated id and timestamps; storage assigns its own.
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            role: self.role,
            pets: self.pets,
        }
    }
}

/// Generated pet, never adopted and without an owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyntheticPet {
    pub id: Uuid,
    pub name: String,
    pub specie: Species,
    pub birth_date: Date,
    pub adopted: bool,
    pub owner: Option<Uuid>,
    pub image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SyntheticPet {
    /// Drops the generated id and timestamps; storage assigns its own.
    pub fn into_new_pet(self) -> NewPet {
        NewPet {
            name: self.name,
            specie: self.specie.as_str().to_string(),
            birth_date: Some(self.birth_date),
            adopted: self.adopted,
            owner: self.owner,
            image: Some(self.image),
        }
    }
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Plaintext hashed once per batch and shared by every user.
    pub password: String,
    /// Probability that a user is an admin (0.0-1.0).
    pub admin_probability: f64,
    /// Email domains to pick from.
    pub email_domains: Vec<String>,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            password: MOCK_PASSWORD.to_string(),
            admin_probability: 0.5,
            email_domains: vec![
                "gmail.com".to_string(),
                "outlook.com".to_string(),
                "yahoo.com".to_string(),
                "proton.me".to_string(),
            ],
        }
    }
}

/// Generates users for seeding.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` users sharing a single password hash.
    ///
    /// The hash is computed once up front; argon2 is far too slow to run per record.
    pub fn generate_batch(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<SyntheticUser>, GenerationError> {
        let password_hash = hash_password(&self.config.password)
            .map_err(|e| GenerationError::PasswordHash(e.to_string()))?;
        let now = OffsetDateTime::now_utc();

        Ok((0..count)
            .map(|_| self.generate(&password_hash, now, rng))
            .collect())
    }

    fn generate(
        &self,
        password_hash: &str,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> SyntheticUser {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let email = self.generate_email(&first_name, &last_name, rng);

        let role = if rng.gen_bool(self.config.admin_probability) {
            Role::Admin
        } else {
            Role::User
        };

        SyntheticUser {
            id: random_id(rng),
            first_name,
            last_name,
            email,
            password: password_hash.to_string(),
            role,
            pets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Generates an email from a name.
    fn generate_email(&self, first_name: &str, last_name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = format!("{first_name} {last_name}")
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..9999);
        let domain = if self.config.email_domains.is_empty() {
            "example.com"
        } else {
            self.config.email_domains[rng.gen_range(0..self.config.email_domains.len())].as_str()
        };

        format!("{normalized}{suffix}@{domain}")
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for pet generation.
#[derive(Debug, Clone)]
pub struct PetGenConfig {
    /// Birth dates fall within this many years before today.
    pub max_age_years: i32,
    /// Image URLs are `{image_base_url}?lock={n}`.
    pub image_base_url: String,
}

impl Default for PetGenConfig {
    fn default() -> Self {
        Self {
            max_age_years: 10,
            image_base_url: "https://loremflickr.com/640/480/animals".to_string(),
        }
    }
}

/// Generates pets for seeding.
pub struct PetGenerator {
    config: PetGenConfig,
}

impl PetGenerator {
    pub fn new() -> Self {
        Self {
            config: PetGenConfig::default(),
        }
    }

    pub fn with_config(config: PetGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single pet.
    pub fn generate(&self, now: OffsetDateTime, rng: &mut impl Rng) -> SyntheticPet {
        let name: String = FirstName().fake_with_rng(rng);
        let specie = Species::ALL[rng.gen_range(0..Species::ALL.len())];
        let lock: u32 = rng.gen_range(1..100_000);

        SyntheticPet {
            id: random_id(rng),
            name,
            specie,
            birth_date: self.generate_birth_date(now.date(), rng),
            adopted: false,
            owner: None,
            image: format!("{}?lock={lock}", self.config.image_base_url),
            created_at: now,
            updated_at: now,
        }
    }

    /// Generates multiple pets.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<SyntheticPet> {
        let now = OffsetDateTime::now_utc();
        (0..count).map(|_| self.generate(now, rng)).collect()
    }

    /// Picks a day uniformly between `max_age_years` ago and today, inclusive.
    fn generate_birth_date(&self, today: Date, rng: &mut impl Rng) -> Date {
        let earliest = years_before(today, self.config.max_age_years);
        let span = (today - earliest).whole_days().max(0);
        today - Duration::days(rng.gen_range(0..=span))
    }
}

impl Default for PetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Same calendar day `years` earlier; Feb 29 falls back to Feb 28.
fn years_before(today: Date, years: i32) -> Date {
    let year = today.year() - years;
    today
        .replace_year(year)
        .or_else(|_| today.replace_day(28).and_then(|d| d.replace_year(year)))
        .unwrap_or(Date::MIN)
}

fn random_id(rng: &mut impl Rng) -> Uuid {
    Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::date;

    use super::*;
    use crate::auth::verify_password;

    #[test]
    fn test_generate_users_share_one_hash() {
        let user_gen = UserGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);
        let users = user_gen.generate_batch(12, &mut rng).unwrap();

        assert_eq!(users.len(), 12);
        let hashes: HashSet<_> = users.iter().map(|u| u.password.as_str()).collect();
        assert_eq!(hashes.len(), 1);
        assert!(verify_password(MOCK_PASSWORD, &users[0].password).unwrap());
    }

    #[test]
    fn test_generate_users_fields() {
        let user_gen = UserGenerator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let users = user_gen.generate_batch(20, &mut rng).unwrap();

        for user in &users {
            assert!(!user.first_name.is_empty());
            assert!(!user.last_name.is_empty());
            assert!(user.email.contains('@'));
            assert!(user.pets.is_empty());
            assert_eq!(user.created_at, user.updated_at);
        }

        let ids: HashSet<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_zero_users_still_succeeds() {
        let mut rng = StdRng::seed_from_u64(1);
        let users = UserGenerator::new().generate_batch(0, &mut rng).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn test_admin_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let admins = UserGenerator::with_config(UserGenConfig {
            admin_probability: 1.0,
            ..UserGenConfig::default()
        })
        .generate_batch(5, &mut rng)
        .unwrap();
        assert!(admins.iter().all(|u| u.role == Role::Admin));

        let regular = UserGenerator::with_config(UserGenConfig {
            admin_probability: 0.0,
            ..UserGenConfig::default()
        })
        .generate_batch(5, &mut rng)
        .unwrap();
        assert!(regular.iter().all(|u| u.role == Role::User));
    }

    #[test]
    fn test_generate_pets_species_and_defaults() {
        let pet_gen = PetGenerator::new();
        let mut rng = StdRng::seed_from_u64(42);
        let pets = pet_gen.generate_batch(200, &mut rng);

        assert_eq!(pets.len(), 200);
        for pet in &pets {
            assert!(Species::ALL.contains(&pet.specie));
            assert!(!pet.adopted);
            assert!(pet.owner.is_none());
            assert!(pet.image.starts_with("https://"));
        }

        // 200 draws over 7 species should hit every one of them.
        let seen: HashSet<_> = pets.iter().map(|p| p.specie).collect();
        assert_eq!(seen.len(), Species::ALL.len());
    }

    #[test]
    fn test_pet_birth_dates_within_window() {
        let pet_gen = PetGenerator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let now = OffsetDateTime::now_utc();
        let earliest = years_before(now.date(), 10);

        for _ in 0..500 {
            let pet = pet_gen.generate(now, &mut rng);
            assert!(pet.birth_date <= now.date());
            assert!(pet.birth_date >= earliest);
        }
    }

    #[test]
    fn test_years_before_leap_day() {
        assert_eq!(years_before(date!(2024 - 02 - 29), 10), date!(2014 - 02 - 28));
        assert_eq!(years_before(date!(2025 - 06 - 15), 10), date!(2015 - 06 - 15));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let pet_gen = PetGenerator::new();
        let now = OffsetDateTime::now_utc();
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..5).map(|_| pet_gen.generate(now, &mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(99);
            (0..5).map(|_| pet_gen.generate(now, &mut rng)).collect()
        };

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.name, y.name);
            assert_eq!(x.specie, y.specie);
            assert_eq!(x.birth_date, y.birth_date);
        }
    }

    #[test]
    fn test_into_new_pet_strips_generated_fields() {
        let mut rng = StdRng::seed_from_u64(8);
        let pet = PetGenerator::new().generate(OffsetDateTime::now_utc(), &mut rng);
        let specie = pet.specie;
        let new_pet = pet.into_new_pet();

        assert_eq!(new_pet.specie, specie.as_str());
        assert!(!new_pet.adopted);
        assert!(new_pet.owner.is_none());
    }
}
