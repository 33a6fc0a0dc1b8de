//! Natural-language command interpretation.
//!
//! One request runs linearly: build the prompt, call the model once, recover
//! an intent from whatever text came back, then perform at most one mutation.

mod extraction;
mod prompt;

use std::sync::Arc;

use tracing::{debug, info, warn};

use warden_core::{AppError, AppResult, UserIdentity};
use warden_domain::{CommandAction, CommandParams, ParsedCommand, PermissionId, RoleId};

use crate::command_ports::CommandModel;
use crate::rbac_ports::{PageRequest, PermissionRecord, RolePermissionRecord, RoleRecord};
use crate::{DetachedPermission, PermissionService, RoleService};

pub use extraction::extract_command;
pub use prompt::build_prompt;

/// Number of roles and permissions scanned when resolving names.
pub const RESOLUTION_PAGE_SIZE: u64 = 100;

/// Result message for commands that request nothing.
pub const NO_OP_MESSAGE: &str = "Command executed";

/// Value produced by the single mutation a command performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A role was created.
    RoleCreated(RoleRecord),
    /// A permission was created.
    PermissionCreated(PermissionRecord),
    /// A permission was attached to a role.
    PermissionAttached(RolePermissionRecord),
    /// A permission was detached from a role.
    PermissionDetached(DetachedPermission),
    /// Nothing was mutated.
    Message(String),
}

/// Successful interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Intent recovered from the model output.
    pub parsed: ParsedCommand,
    /// Mutation result.
    pub result: CommandResult,
}

/// Failed interpretation.
///
/// `parsed` is present once an intent was recovered, so callers can show
/// what the model understood alongside the failure.
#[derive(Debug)]
pub struct CommandFailure {
    /// Failure category and message.
    pub error: AppError,
    /// Intent recovered before the failure, if any.
    pub parsed: Option<ParsedCommand>,
}

/// Application service translating free text into one RBAC mutation.
#[derive(Clone)]
pub struct CommandService {
    command_model: Arc<dyn CommandModel>,
    role_service: RoleService,
    permission_service: PermissionService,
}

impl CommandService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        command_model: Arc<dyn CommandModel>,
        role_service: RoleService,
        permission_service: PermissionService,
    ) -> Self {
        Self {
            command_model,
            role_service,
            permission_service,
        }
    }

    /// Interprets and executes a free-text command on behalf of `actor`.
    pub async fn interpret(
        &self,
        actor: &UserIdentity,
        command_text: &str,
    ) -> Result<CommandOutcome, CommandFailure> {
        if command_text.trim().is_empty() {
            return Err(CommandFailure {
                error: AppError::Validation("command is required".to_owned()),
                parsed: None,
            });
        }

        let prompt = build_prompt(command_text);
        let raw_output = self
            .command_model
            .generate(&prompt)
            .await
            .map_err(|error| {
                warn!(subject = actor.subject(), %error, "command model call failed");
                CommandFailure {
                    error,
                    parsed: None,
                }
            })?;
        debug!(raw_output = %raw_output, "command model responded");

        let parsed = extract_command(&raw_output);
        info!(
            subject = actor.subject(),
            action = parsed.action.as_str(),
            "dispatching parsed command"
        );

        match self.dispatch(&parsed).await {
            Ok(result) => Ok(CommandOutcome { parsed, result }),
            Err(error) => Err(CommandFailure {
                error,
                parsed: Some(parsed),
            }),
        }
    }

    async fn dispatch(&self, command: &ParsedCommand) -> AppResult<CommandResult> {
        let params = &command.params;

        match command.action {
            CommandAction::CreateRole => {
                let role_name = params
                    .role_name
                    .as_deref()
                    .ok_or_else(|| AppError::Validation("Role name is required".to_owned()))?;

                self.role_service
                    .create(role_name)
                    .await
                    .map(CommandResult::RoleCreated)
            }
            CommandAction::CreatePermission => {
                let permission_name = params.permission_name.as_deref().ok_or_else(|| {
                    AppError::Validation("Permission name is required".to_owned())
                })?;

                self.permission_service
                    .create(permission_name, Some(String::new()))
                    .await
                    .map(CommandResult::PermissionCreated)
            }
            CommandAction::AttachPermission => {
                let (role_id, permission_id) = self.resolve_pair(params).await?;

                self.role_service
                    .add_permission(role_id, permission_id)
                    .await
                    .map(CommandResult::PermissionAttached)
            }
            CommandAction::DetachPermission => {
                let (role_id, permission_id) = self.resolve_pair(params).await?;

                self.role_service
                    .remove_permission(role_id, permission_id)
                    .await
                    .map(CommandResult::PermissionDetached)
            }
            CommandAction::Unknown => Ok(CommandResult::Message(NO_OP_MESSAGE.to_owned())),
        }
    }

    /// Resolves both names by case-insensitive substring over the first page
    /// of each listing. The first match in listing order wins.
    async fn resolve_pair(&self, params: &CommandParams) -> AppResult<(RoleId, PermissionId)> {
        let (Some(role_name), Some(permission_name)) =
            (params.role_name.as_deref(), params.permission_name.as_deref())
        else {
            return Err(AppError::Validation(
                "Role name and permission name are required".to_owned(),
            ));
        };

        let page = PageRequest {
            skip: 0,
            take: RESOLUTION_PAGE_SIZE,
        };
        let roles = self.role_service.find_all(page).await?.data;
        let permissions = self.permission_service.find_all(page).await?.data;

        let role = roles
            .iter()
            .find(|role| contains_ignoring_case(&role.role.name, role_name));
        let permission = permissions
            .iter()
            .find(|permission| contains_ignoring_case(&permission.name, permission_name));

        match (role, permission) {
            (Some(role), Some(permission)) => Ok((role.role.id, permission.id)),
            _ => Err(AppError::NotFound(format!(
                "Role or permission not found. Found roles: {}. Found permissions: {}",
                join_names_or_none(roles.iter().map(|role| role.role.name.as_str())),
                join_names_or_none(permissions.iter().map(|permission| permission.name.as_str())),
            ))),
        }
    }
}

fn contains_ignoring_case(candidate: &str, fragment: &str) -> bool {
    candidate.to_lowercase().contains(&fragment.to_lowercase())
}

fn join_names_or_none<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_owned()
    } else {
        joined
    }
}
