use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{LoginProvider, LoginRequest, OAuthProfile, RegisterRequest, Role, User};
use crate::domain::validation::{validate_email, validate_login, validate_register};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

/// Issued on every successful sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: RegisterRequest) -> Result<User> {
        trace!("Starting user registration");
        let req = validate_register(&req)?;

        if self.user_repository.find_user_by_email(&req.email).await?.is_some() {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::conflict("User already exist").into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {e}"))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: req.username,
            email: req.email,
            password_hash: Some(password_hash),
            role: Role::User,
            login: LoginProvider::Credentials,
            image: None,
            street: Some(req.street),
            city: Some(req.city),
            phone: Some(req.phone),
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.insert_user(user.clone()).await.inspect_err(|e| {
            warn!(error = %e, "User insert rejected");
        })?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<Session> {
        trace!("Starting login");
        validate_login(&req)?;

        let user = self
            .user_repository
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::Unauthorized("Invalid email or password".to_string())
            })?;

        // Accounts created through a provider have nothing to check against.
        let Some(hash) = user.password_hash.as_deref() else {
            warn!(user_id = %user.id, login = ?user.login, "Password login attempted on provider account");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        };

        let is_valid = verify_password(&req.password, hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {e}"))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }

        let session = self.issue_session(user)?;
        info!(user_id = %session.user.id, "Login successful");
        Ok(session)
    }

    /// Signs in a user the third-party provider has already verified,
    /// creating the account on first sight. The provider subject is the
    /// account id; a changed provider email is carried over to the account.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn oauth_sign_in(&self, profile: OAuthProfile) -> Result<Session> {
        let email = validate_email(&profile.email)?;
        let sub = profile.sub.trim();
        if sub.is_empty() {
            return Err(DomainError::validation("Provider subject is required").into());
        }

        if let Some(existing) = self.user_repository.find_user_by_id(sub).await? {
            let user = if existing.email.eq_ignore_ascii_case(&email) {
                existing
            } else {
                debug!(user_id = %existing.id, "Provider reports a new email");
                let user = self
                    .user_repository
                    .update_user(sub, move |user| user.email = email)
                    .await?;
                info!(user_id = %user.id, "Provider account email updated");
                user
            };
            return self.issue_session(user);
        }

        if let Some(existing) = self.user_repository.find_user_by_email(&email).await? {
            debug!(user_id = %existing.id, "Provider sign-in for existing account");
            return self.issue_session(existing);
        }

        let username = match profile.name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            name => name.to_string(),
        };
        let user = User {
            id: sub.to_string(),
            username,
            email,
            password_hash: None,
            role: Role::User,
            login: LoginProvider::Google,
            image: profile.image,
            street: None,
            city: None,
            phone: None,
        };
        self.user_repository.insert_user(user.clone()).await?;
        info!(user_id = %user.id, "Provider account created");

        self.issue_session(user)
    }

    /// Registers the configured administrator, or promotes the existing
    /// account with that email.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User> {
        let email = validate_email(email)?;
        if let Some(user) = self.user_repository.find_user_by_email(&email).await? {
            if user.role == Role::Admin {
                return Ok(user);
            }
            let user = self
                .user_repository
                .update_user(&user.id, |user| user.role = Role::Admin)
                .await?;
            info!(user_id = %user.id, "Existing account promoted to admin");
            return Ok(user);
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {e}")))?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: "admin".to_string(),
            email,
            password_hash: Some(password_hash),
            role: Role::Admin,
            login: LoginProvider::Credentials,
            image: None,
            street: None,
            city: None,
            phone: None,
        };
        self.user_repository.insert_user(user.clone()).await?;
        info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }

    fn issue_session(&self, user: User) -> Result<Session> {
        let access_token =
            generate_token(&user, &self.jwt_secret, self.token_ttl_secs).map_err(|e| {
                error!(error = %e, "Failed to generate token");
                DomainError::Internal(format!("Failed to generate token: {e}"))
            })?;
        Ok(Session { access_token, user })
    }
}
