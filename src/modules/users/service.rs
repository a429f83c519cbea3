use std::path::Path;

use anyhow::{Context, anyhow};
use starlink_core::permissions::ROLE_SUPER_ADMIN;
use starlink_core::{AppError, hash_password};
use starlink_models::{SeedUser, UserProfile};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{RoleCatalog, UserRecord};
use super::repository::UserRepository;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "adminpassword";

pub struct UserService;

impl UserService {
    #[instrument(skip(users, catalog))]
    pub async fn get_users(
        users: &dyn UserRepository,
        catalog: &RoleCatalog,
    ) -> Result<Vec<UserProfile>, AppError> {
        Ok(users
            .list()
            .await?
            .iter()
            .map(|u| u.to_profile(catalog))
            .collect())
    }

    #[instrument(skip(users, catalog))]
    pub async fn get_user(
        users: &dyn UserRepository,
        catalog: &RoleCatalog,
        id: Uuid,
    ) -> Result<UserProfile, AppError> {
        users
            .find_by_id(id)
            .await?
            .map(|u| u.to_profile(catalog))
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Creates the default Super Admin unless an account with that email
    /// already exists. Returns whether a user was created.
    #[instrument(skip(users))]
    pub async fn seed_default_admin(users: &dyn UserRepository) -> Result<bool, AppError> {
        if users.find_by_email(DEFAULT_ADMIN_EMAIL).await?.is_some() {
            return Ok(false);
        }

        let admin = UserRecord::new(
            DEFAULT_ADMIN_EMAIL,
            hash_password(DEFAULT_ADMIN_PASSWORD)?,
            vec![ROLE_SUPER_ADMIN.to_string()],
        )
        .with_names(Some("Admin".to_string()), Some("User".to_string()));

        users.insert(admin).await?;
        info!(email = DEFAULT_ADMIN_EMAIL, "Default admin user created");
        Ok(true)
    }

    /// Inserts seed users, skipping emails that already exist and roles the
    /// catalog does not know. Returns how many users were inserted.
    #[instrument(skip(users, catalog, seeds), fields(count = seeds.len()))]
    pub async fn seed_users(
        users: &dyn UserRepository,
        catalog: &RoleCatalog,
        seeds: Vec<SeedUser>,
    ) -> Result<usize, AppError> {
        let mut inserted = 0;
        for mut seed in seeds {
            if users.find_by_email(&seed.email).await?.is_some() {
                continue;
            }

            seed.roles.retain(|role| {
                let known = catalog.is_known(role);
                if !known {
                    warn!(email = %seed.email, role = %role, "Skipping unknown role in seed");
                }
                known
            });

            users.insert(UserRecord::from(seed)).await?;
            inserted += 1;
        }

        info!(inserted, "Seed users loaded");
        Ok(inserted)
    }

    pub fn load_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<SeedUser>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse seed file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use starlink_core::verify_password;

    use super::*;
    use crate::modules::users::repository::InMemoryUserRepository;

    fn seed(email: &str, roles: &[&str]) -> SeedUser {
        SeedUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
            is_active: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_default_admin_seeded_once() {
        let repo = InMemoryUserRepository::new();

        assert!(UserService::seed_default_admin(&repo).await.unwrap());
        assert!(!UserService::seed_default_admin(&repo).await.unwrap());

        let admin = repo.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().unwrap();
        assert_eq!(admin.roles, vec![ROLE_SUPER_ADMIN.to_string()]);
        assert!(verify_password(DEFAULT_ADMIN_PASSWORD, &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_seed_users_skips_existing_and_unknown_roles() {
        let repo = InMemoryUserRepository::new();
        let catalog = RoleCatalog::default();
        let seeds = vec![
            seed("a@b.com", &["Client", "Auditor"]),
            seed("a@b.com", &["Client"]),
            seed("c@d.com", &["Technician"]),
        ];

        let inserted = UserService::seed_users(&repo, &catalog, seeds).await.unwrap();

        assert_eq!(inserted, 2);
        let first = repo.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(first.roles, vec!["Client".to_string()]);
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let err = UserService::get_user(&repo, &RoleCatalog::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_seed_file_is_error() {
        assert!(UserService::load_seed_file("/nonexistent/seed.json").is_err());
    }
}
