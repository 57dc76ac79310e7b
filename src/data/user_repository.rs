use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self), fields(user_id = %user.id, email = %user.email))]
    async fn insert_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.contains_key(&user.id)
            || storage.values().any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            debug!("User id or email already taken");
            return Err(DomainError::conflict("User already exist").into());
        }
        debug!(role = ?user.role, "User saved to memory storage");
        storage.insert(user.id.clone(), user);
        Ok(())
    }

    #[instrument(skip(self, change), fields(user_id = id))]
    async fn update_user<F>(&self, id: &str, change: F) -> Result<User>
    where
        F: FnOnce(&mut User) + Send + 'static,
    {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        let mut user = storage
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("User {id} not found")))?;
        change(&mut user);
        user.id = id.to_string();

        if storage
            .values()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&user.email))
        {
            debug!(email = %user.email, "Email belongs to another user");
            return Err(DomainError::conflict("Email is already in use").into());
        }
        storage.insert(user.id.clone(), user.clone());
        debug!(role = ?user.role, "User updated in memory storage");
        Ok(user)
    }

    /// Emails compare case-insensitively.
    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }
}
