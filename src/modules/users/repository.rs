//! User persistence.
//!
//! [`UserRepository`] is the seam handlers and services talk to. The
//! in-memory implementation backs the server and every test; emails are
//! matched case-insensitively.

use std::collections::HashMap;
use std::fmt::Debug;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use starlink_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::UserRecord;

#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError>;

    /// Stores a new user. Fails with 409 if the email is taken.
    async fn insert(&self, user: UserRecord) -> Result<UserRecord, AppError>;

    async fn list(&self) -> Result<Vec<UserRecord>, AppError>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<(), AppError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: UserRecord) -> Result<UserRecord, AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::conflict(anyhow!("Email already registered")));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;
        user.last_login_at = Some(at);
        Ok(())
    }
}
