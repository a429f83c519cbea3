//! Seed user generation.
//!
//! Produces JSON files of [`SeedUser`] entries that the server loads at
//! startup through `USERS_SEED_FILE`. Every generated user shares one
//! password hash so the file is cheap to produce for large counts.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use starlink_core::AppError;
use starlink_core::password::hash_password_with_cost;
use starlink_core::permissions::ROLE_CLIENT;
use starlink_models::SeedUser;

/// Password given to generated users unless overridden.
pub const DEFAULT_SEED_PASSWORD: &str = "password123";

/// Lowest cost bcrypt accepts; seeding favours speed over strength.
pub const DEFAULT_SEED_COST: u32 = 4;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub count: usize,
    pub role: String,
    pub password: String,
    pub cost: u32,
}

impl SeedOptions {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            role: ROLE_CLIENT.to_string(),
            password: DEFAULT_SEED_PASSWORD.to_string(),
            cost: DEFAULT_SEED_COST,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}

/// Generates `count` users holding `role`, all sharing `password_hash`.
///
/// Emails embed the user index so they stay unique even when the fake
/// names collide.
pub fn generate_users(count: usize, role: &str, password_hash: &str) -> Vec<SeedUser> {
    let prefix = role.to_lowercase().replace(' ', "-");

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            let email = format!(
                "{}.{}+{}{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                prefix,
                idx
            );

            SeedUser {
                email,
                password_hash: password_hash.to_string(),
                first_name: Some(first_name),
                last_name: Some(last_name),
                phone: None,
                is_active: true,
                roles: vec![role.to_string()],
            }
        })
        .collect()
}

/// Hashes the shared password once and generates the users.
pub fn generate_seed(options: &SeedOptions) -> Result<Vec<SeedUser>, AppError> {
    let start_time = Instant::now();
    let password_hash = hash_password_with_cost(&options.password, options.cost)?;
    let users = generate_users(options.count, &options.role, &password_hash);

    println!(
        "👥 Generated {} {} users in {:.2?}",
        users.len(),
        options.role,
        start_time.elapsed()
    );

    Ok(users)
}

/// Writes users as a pretty-printed JSON array, creating parent directories.
pub fn write_seed_file(path: impl AsRef<Path>, users: &[SeedUser]) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(users)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
