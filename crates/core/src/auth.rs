use serde::{Deserialize, Serialize};

/// Identity asserted by a verified bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    email: String,
    roles: Vec<String>,
}

impl UserIdentity {
    /// Creates a user identity from verified credential claims.
    #[must_use]
    pub fn new(subject: impl Into<String>, email: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            roles,
        }
    }

    /// Returns the stable subject claim, which is the user identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the email the credential was issued for.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role names carried by the credential.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_slice()
    }

    /// Returns whether the credential carries the given role name.
    #[must_use]
    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role == role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::UserIdentity;

    #[test]
    fn has_role_uses_exact_names() {
        let identity = UserIdentity::new("u-1", "ops@example.com", vec!["Admin".to_owned()]);
        assert!(identity.has_role("Admin"));
        assert!(!identity.has_role("admin"));
    }
}
