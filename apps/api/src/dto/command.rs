use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::{CommandOutcome, CommandResult};
use warden_domain::{CommandParams, ParsedCommand};

use super::common::MessageResponse;
use super::permissions::PermissionResponse;
use super::roles::{DetachedPermissionResponse, RolePermissionResponse, RoleResponse};

/// Incoming free-text command.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/parse-command-request.ts"
)]
#[serde(default)]
pub struct ParseCommandRequest {
    #[ts(optional)]
    pub command: Option<String>,
}

/// Intent recovered from the model output.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/parsed-command-response.ts"
)]
pub struct ParsedCommandResponse {
    #[ts(
        type = "\"create_role\" | \"create_permission\" | \"attach_permission\" | \"detach_permission\" | \"unknown\""
    )]
    pub action: String,
    #[ts(type = "{ role_name?: string | null, permission_name?: string | null }")]
    pub params: CommandParams,
}

/// Value produced by the executed command.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/command-result-response.ts"
)]
#[serde(untagged)]
pub enum CommandResultResponse {
    Role(RoleResponse),
    Permission(PermissionResponse),
    Attached(RolePermissionResponse),
    Detached(DetachedPermissionResponse),
    Message(MessageResponse),
}

/// Successful interpretation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/parse-command-response.ts"
)]
pub struct ParseCommandResponse {
    pub success: bool,
    pub parsed: ParsedCommandResponse,
    pub result: CommandResultResponse,
}

impl From<ParsedCommand> for ParsedCommandResponse {
    fn from(value: ParsedCommand) -> Self {
        Self {
            action: value.action.as_str().to_owned(),
            params: value.params,
        }
    }
}

impl From<CommandResult> for CommandResultResponse {
    fn from(value: CommandResult) -> Self {
        match value {
            CommandResult::RoleCreated(role) => Self::Role(role.into()),
            CommandResult::PermissionCreated(permission) => Self::Permission(permission.into()),
            CommandResult::PermissionAttached(link) => Self::Attached(link.into()),
            CommandResult::PermissionDetached(detached) => Self::Detached(detached.into()),
            CommandResult::Message(message) => Self::Message(MessageResponse { message }),
        }
    }
}

impl From<CommandOutcome> for ParseCommandResponse {
    fn from(value: CommandOutcome) -> Self {
        Self {
            success: true,
            parsed: value.parsed.into(),
            result: value.result.into(),
        }
    }
}
