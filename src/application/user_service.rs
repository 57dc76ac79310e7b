use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{AuthProfileUpdate, ContactUpdate, User};
use crate::domain::validation::{validate_auth_profile, validate_contact};
use crate::infrastructure::security::hash_password;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Who is asking, as carried by the session token.
#[derive(Debug, Clone, Copy)]
pub struct Requester<'a> {
    pub user_id: &'a str,
    pub is_admin: bool,
}

pub struct UserService<R: UserRepository> {
    users: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }

    async fn find(&self, id: &str) -> Result<User> {
        Ok(self
            .users
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {id} not found")))?)
    }

    fn ensure_self(requester: Requester<'_>, id: &str) -> Result<(), DomainError> {
        if requester.user_id != id {
            warn!(requester = requester.user_id, target_user = id, "Profile edit on another account");
            return Err(DomainError::Forbidden(
                "You can only change your own profile".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> Result<User> {
        self.find(user_id).await
    }

    /// Owners and admins may read an account.
    pub async fn get(&self, requester: Requester<'_>, id: &str) -> Result<User> {
        if requester.user_id != id && !requester.is_admin {
            return Err(DomainError::Forbidden("Not allowed to view this user".to_string()).into());
        }
        self.find(id).await
    }

    /// A blank password leaves the stored credential untouched.
    #[instrument(skip(self, form))]
    pub async fn update_auth(
        &self,
        requester: Requester<'_>,
        id: &str,
        form: AuthProfileUpdate,
    ) -> Result<User> {
        Self::ensure_self(requester, id)?;
        let form = validate_auth_profile(&form)?;

        let password_hash = match form.password {
            Some(password) => Some(hash_password(&password).map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {e}"))
            })?),
            None => None,
        };
        let password_changed = password_hash.is_some();

        let (username, email) = (form.username, form.email);
        let user = self
            .users
            .update_user(id, move |user| {
                user.username = username;
                user.email = email;
                if let Some(hash) = password_hash {
                    user.password_hash = Some(hash);
                }
            })
            .await?;

        if password_changed {
            info!(user_id = %user.id, "Password changed");
        }
        info!(user_id = %user.id, "Profile id:{} is updated", user.id);
        Ok(user)
    }

    #[instrument(skip(self, form))]
    pub async fn update_contact(
        &self,
        requester: Requester<'_>,
        id: &str,
        form: ContactUpdate,
    ) -> Result<User> {
        Self::ensure_self(requester, id)?;
        let form = validate_contact(&form)?;

        let user = self
            .users
            .update_user(id, move |user| {
                user.street = Some(form.street);
                user.city = Some(form.city);
                user.phone = Some(form.phone);
            })
            .await?;
        info!(user_id = %user.id, "Contact details updated");
        Ok(user)
    }
}
