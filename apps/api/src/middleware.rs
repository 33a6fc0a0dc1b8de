use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiResult, RevealedError};
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(request.headers()).unwrap_or_default();
    let identity = state.auth_service.authenticate(token.as_str())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Replaces generic 500 bodies with their detail. Mounted in development only.
pub async fn reveal_internal_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<RevealedError>().cloned() {
        Some(RevealedError(payload)) => (response.status(), Json(payload)).into_response(),
        None => response,
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_owned())
}
