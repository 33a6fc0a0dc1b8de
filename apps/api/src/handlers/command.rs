use axum::Json;
use axum::extract::{Extension, State};
use warden_core::UserIdentity;

use crate::dto::{ParseCommandRequest, ParseCommandResponse};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn parse_command_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<ParseCommandRequest>,
) -> ApiResult<Json<ParseCommandResponse>> {
    let command = payload.command.unwrap_or_default();
    let outcome = state.command_service.interpret(&user, command.as_str()).await?;

    Ok(Json(outcome.into()))
}
