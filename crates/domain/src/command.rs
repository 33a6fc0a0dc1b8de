//! Structured intent extracted from a free-text administration command.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Mutation requested by a natural-language command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    /// Create a role named by `role_name`.
    CreateRole,
    /// Create a permission named by `permission_name`.
    CreatePermission,
    /// Attach a permission to a role, both resolved by name.
    AttachPermission,
    /// Detach a permission from a role, both resolved by name.
    DetachPermission,
    /// Nothing recognisable was requested.
    Unknown,
}

impl CommandAction {
    /// Returns the wire value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRole => "create_role",
            Self::CreatePermission => "create_permission",
            Self::AttachPermission => "attach_permission",
            Self::DetachPermission => "detach_permission",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a wire value. Anything unrecognised is [`CommandAction::Unknown`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "create_role" => Self::CreateRole,
            "create_permission" => Self::CreatePermission,
            "attach_permission" => Self::AttachPermission,
            "detach_permission" => Self::DetachPermission,
            _ => Self::Unknown,
        }
    }

    /// Returns all actions in prompt order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CommandAction] = &[
            CommandAction::CreateRole,
            CommandAction::CreatePermission,
            CommandAction::AttachPermission,
            CommandAction::DetachPermission,
            CommandAction::Unknown,
        ];

        ALL
    }
}

/// Names referenced by a command.
///
/// Serializes as `{}` when no name is present, otherwise with both keys and
/// `null` for the absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParams {
    /// Role the command refers to.
    pub role_name: Option<String>,
    /// Permission the command refers to.
    pub permission_name: Option<String>,
}

impl CommandParams {
    /// Builds params from raw extracted values.
    ///
    /// Values are trimmed; blank values and the literal `null` count as absent.
    #[must_use]
    pub fn from_raw(role_name: Option<&str>, permission_name: Option<&str>) -> Self {
        Self {
            role_name: normalize_param(role_name),
            permission_name: normalize_param(permission_name),
        }
    }
}

impl Serialize for CommandParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.role_name.is_none() && self.permission_name.is_none() {
            return serializer.serialize_map(Some(0))?.end();
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("role_name", &self.role_name)?;
        map.serialize_entry("permission_name", &self.permission_name)?;
        map.end()
    }
}

fn normalize_param(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    Some(trimmed.to_owned())
}

/// Transient intent produced per request and discarded after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    /// Requested action.
    pub action: CommandAction,
    /// Referenced names.
    pub params: CommandParams,
}

impl ParsedCommand {
    /// Creates a parsed command.
    #[must_use]
    pub fn new(action: CommandAction, params: CommandParams) -> Self {
        Self { action, params }
    }

    /// The fallback intent: `{"action":"unknown","params":{}}`.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(CommandAction::Unknown, CommandParams::default())
    }
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self::unknown()
    }
}
