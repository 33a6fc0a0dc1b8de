use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::{AuthSession, SessionUser};
use warden_core::UserIdentity;

/// Combined signup/login payload selected by `action`.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-request.ts"
)]
#[serde(default)]
pub struct AuthRequest {
    #[ts(optional)]
    pub action: Option<String>,
    #[ts(optional)]
    pub username: Option<String>,
    #[ts(optional)]
    pub email: Option<String>,
    #[ts(optional)]
    pub password: Option<String>,
}

/// User the issued credential belongs to.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-user-response.ts"
)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Issued bearer credential.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-session-response.ts"
)]
pub struct AuthSessionResponse {
    pub token: String,
    pub user: SessionUserResponse,
}

/// Identity asserted by the presented credential.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/me-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<SessionUser> for SessionUserResponse {
    fn from(value: SessionUser) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email,
            roles: value.roles,
        }
    }
}

impl From<AuthSession> for AuthSessionResponse {
    fn from(value: AuthSession) -> Self {
        Self {
            token: value.token,
            user: value.user.into(),
        }
    }
}

impl From<UserIdentity> for MeResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.subject().to_owned(),
            email: identity.email().to_owned(),
            roles: identity.roles().to_vec(),
        }
    }
}
