use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tracing::info;
use warden_application::SignupInput;
use warden_core::{AppError, UserIdentity};

use crate::dto::{AuthRequest, AuthSessionResponse, MeResponse};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn auth_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AuthRequest>,
) -> ApiResult<(StatusCode, Json<AuthSessionResponse>)> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    match payload.action.as_deref() {
        Some("signup") => {
            let session = state
                .auth_service
                .signup(SignupInput {
                    email,
                    password,
                    username: payload
                        .username
                        .filter(|username| !username.trim().is_empty()),
                })
                .await?;
            info!(user_id = %session.user.id, "user signed up");

            Ok((StatusCode::CREATED, Json(session.into())))
        }
        Some("login") => {
            let session = state
                .auth_service
                .login(email.as_str(), password.as_str())
                .await?;

            Ok((StatusCode::OK, Json(session.into())))
        }
        _ => Err(AppError::Validation("Invalid action".to_owned()).into()),
    }
}

pub async fn me_handler(Extension(user): Extension<UserIdentity>) -> Json<MeResponse> {
    Json(MeResponse::from(user))
}
