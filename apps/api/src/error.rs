use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use warden_application::CommandFailure;
use warden_core::AppError;
use warden_domain::ParsedCommand;

use crate::dto::ParsedCommandResponse;

mod types;

pub use types::{ErrorResponse, RevealedError};

const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// HTTP API error wrapper around core application errors.
///
/// Interpreter failures keep the recovered intent so it is returned next to
/// the message.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    parsed: Option<ParsedCommand>,
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self {
            error: value,
            parsed: None,
        }
    }
}

impl From<CommandFailure> for ApiError {
    fn from(value: CommandFailure) -> Self {
        Self {
            error: value.error,
            parsed: value.parsed,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        AppError::Validation(value.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        AppError::Validation(value.body_text()).into()
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        let parsed = self.parsed.map(ParsedCommandResponse::from);

        let AppError::Internal(detail) = self.error else {
            let payload = ErrorResponse::new(self.error.message().to_owned(), parsed);
            return (status, Json(payload)).into_response();
        };

        error!(detail = %detail, "request failed with internal error");
        let mut response = (
            status,
            Json(ErrorResponse::new(
                INTERNAL_ERROR_MESSAGE.to_owned(),
                parsed.clone(),
            )),
        )
            .into_response();
        response
            .extensions_mut()
            .insert(RevealedError(ErrorResponse::new(detail, parsed)));
        response
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
