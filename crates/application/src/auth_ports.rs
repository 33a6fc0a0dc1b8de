//! Ports consumed by the authentication service.

use async_trait::async_trait;

use warden_core::{AppResult, UserIdentity};
use warden_domain::{EmailAddress, UserId, Username};

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical lower-cased email address.
    pub email: String,
    /// Optional unique username.
    pub username: Option<String>,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Names of the roles held by the user.
    pub roles: Vec<String>,
}

/// Input payload for inserting a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Validated email address.
    pub email: EmailAddress,
    /// Optional validated username.
    pub username: Option<Username>,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by canonical email, including held role names.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &Username) -> AppResult<Option<UserRecord>>;

    /// Inserts a user. Duplicate email or username is a conflict.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;
}

/// Port for password hashing. Keeps the application free of direct
/// cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Claims embedded in an issued bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCredential {
    /// Subject user.
    pub user_id: UserId,
    /// Subject email.
    pub email: String,
    /// Role names held at issue time.
    pub roles: Vec<String>,
}

/// Port for issuing and verifying signed bearer credentials.
pub trait CredentialService: Send + Sync {
    /// Issues a signed credential.
    fn issue(&self, credential: &IssueCredential) -> AppResult<String>;

    /// Verifies a credential and returns the identity it asserts.
    ///
    /// Missing, malformed, tampered or expired credentials are `Unauthorized`.
    fn verify(&self, token: &str) -> AppResult<UserIdentity>;
}
