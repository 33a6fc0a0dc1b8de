//! Signup, login and bearer credential verification.
//!
//! Login failures share one generic message and always pay for a password
//! hash so unknown emails and wrong passwords are indistinguishable.

use std::sync::Arc;

use warden_core::{AppError, AppResult, UserIdentity};
use warden_domain::{EmailAddress, UserId, Username, validate_password};

use crate::auth_ports::{CredentialService, IssueCredential, NewUser, PasswordHasher, UserRepository};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Parameters for user signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional unique username.
    pub username: Option<String>,
}

/// User projection returned alongside an issued credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// User identifier.
    pub id: UserId,
    /// Canonical email.
    pub email: String,
    /// Role names carried by the credential.
    pub roles: Vec<String>,
}

/// Issued credential and the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Signed bearer token.
    pub token: String,
    /// Credential subject.
    pub user: SessionUser,
}

/// Application service for user authentication and registration.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    credential_service: Arc<dyn CredentialService>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        credential_service: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            credential_service,
        }
    }

    /// Registers a user and issues a credential with no roles.
    pub async fn signup(&self, input: SignupInput) -> AppResult<AuthSession> {
        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;
        let username = input.username.map(Username::new).transpose()?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_owned(),
            ));
        }

        if let Some(username) = &username
            && self
                .user_repository
                .find_by_username(username)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(
                "User with this username already exists".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                email,
                username,
                password_hash,
            })
            .await?;

        self.issue_session(user.id, user.email, user.roles)
    }

    /// Authenticates with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = EmailAddress::new(email)?;

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        self.issue_session(user.id, user.email, user.roles)
    }

    /// Verifies a bearer credential.
    pub fn authenticate(&self, token: &str) -> AppResult<UserIdentity> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "missing bearer credential".to_owned(),
            ));
        }

        self.credential_service.verify(token)
    }

    fn issue_session(
        &self,
        user_id: UserId,
        email: String,
        roles: Vec<String>,
    ) -> AppResult<AuthSession> {
        let token = self.credential_service.issue(&IssueCredential {
            user_id,
            email: email.clone(),
            roles: roles.clone(),
        })?;

        Ok(AuthSession {
            token,
            user: SessionUser {
                id: user_id,
                email,
                roles,
            },
        })
    }
}
