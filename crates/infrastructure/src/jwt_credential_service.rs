//! HS256 bearer credentials.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use warden_application::{CredentialService, IssueCredential};
use warden_core::{AppError, AppResult, UserIdentity};

/// Minimum accepted signing secret length.
pub const JWT_SECRET_MIN_LENGTH: usize = 32;

/// Credential lifetime used when none is configured.
pub const DEFAULT_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 JSON Web Tokens.
#[derive(Clone)]
pub struct JwtCredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl JwtCredentialService {
    /// Creates a service from a shared secret and credential lifetime.
    pub fn new(secret: &str, lifetime: Duration) -> AppResult<Self> {
        if secret.chars().count() < JWT_SECRET_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {JWT_SECRET_MIN_LENGTH} characters"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        })
    }
}

impl CredentialService for JwtCredentialService {
    fn issue(&self, credential: &IssueCredential) -> AppResult<String> {
        let issued_at = Utc::now().timestamp();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: credential.user_id.to_string(),
            email: credential.email.clone(),
            roles: credential.roles.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign credential: {error}")))
    }

    fn verify(&self, token: &str) -> AppResult<UserIdentity> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("bearer credential has expired".to_owned())
                }
                _ => AppError::Unauthorized("invalid bearer credential".to_owned()),
            })?;

        let claims = data.claims;
        Ok(UserIdentity::new(claims.sub, claims.email, claims.roles))
    }
}

/// Parses a lifetime such as `90s`, `15m`, `12h` or `7d`. A bare number is seconds.
pub fn parse_credential_lifetime(value: &str) -> AppResult<Duration> {
    let value = value.trim();
    let invalid = || {
        AppError::Validation(format!(
            "credential lifetime '{value}' must look like <number>[s|m|h|d]"
        ))
    };

    let (digits, unit_seconds) = match value.char_indices().last() {
        Some((index, 's')) => (&value[..index], 1),
        Some((index, 'm')) => (&value[..index], 60),
        Some((index, 'h')) => (&value[..index], 60 * 60),
        Some((index, 'd')) => (&value[..index], 24 * 60 * 60),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    let amount = digits.parse::<u64>().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    amount
        .checked_mul(unit_seconds)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};
    use warden_application::{CredentialService, IssueCredential};
    use warden_core::{AppError, AppResult};
    use warden_domain::UserId;

    use super::{Claims, DEFAULT_CREDENTIAL_LIFETIME, JwtCredentialService, parse_credential_lifetime};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> AppResult<JwtCredentialService> {
        JwtCredentialService::new(SECRET, DEFAULT_CREDENTIAL_LIFETIME)
    }

    #[test]
    fn issued_credential_verifies_to_same_identity() -> AppResult<()> {
        let service = service()?;
        let user_id = UserId::new();

        let token = service.issue(&IssueCredential {
            user_id,
            email: "ops@example.com".to_owned(),
            roles: vec!["Admin".to_owned()],
        })?;
        let identity = service.verify(&token)?;

        assert_eq!(identity.subject(), user_id.to_string());
        assert_eq!(identity.email(), "ops@example.com");
        assert!(identity.has_role("Admin"));
        Ok(())
    }

    #[test]
    fn credential_signed_with_other_secret_is_rejected() -> AppResult<()> {
        let other = JwtCredentialService::new(
            "ffffffffffffffffffffffffffffffff",
            DEFAULT_CREDENTIAL_LIFETIME,
        )?;
        let token = other.issue(&IssueCredential {
            user_id: UserId::new(),
            email: "ops@example.com".to_owned(),
            roles: Vec::new(),
        })?;

        assert!(matches!(
            service()?.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
        Ok(())
    }

    #[test]
    fn expired_credential_is_rejected() -> AppResult<()> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            email: "ops@example.com".to_owned(),
            roles: Vec::new(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .map_err(|error| AppError::Internal(error.to_string()))?;

        assert!(matches!(
            service()?.verify(&token),
            Err(AppError::Unauthorized(message)) if message == "bearer credential has expired"
        ));
        Ok(())
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(JwtCredentialService::new("too-short", DEFAULT_CREDENTIAL_LIFETIME).is_err());
    }

    #[test]
    fn lifetimes_parse_with_units() -> AppResult<()> {
        assert_eq!(parse_credential_lifetime("7d")?, DEFAULT_CREDENTIAL_LIFETIME);
        assert_eq!(parse_credential_lifetime("15m")?, Duration::from_secs(900));
        assert_eq!(parse_credential_lifetime("12h")?, Duration::from_secs(43_200));
        assert_eq!(parse_credential_lifetime("45")?, Duration::from_secs(45));
        assert!(parse_credential_lifetime("").is_err());
        assert!(parse_credential_lifetime("0d").is_err());
        assert!(parse_credential_lifetime("2w").is_err());
        Ok(())
    }
}
