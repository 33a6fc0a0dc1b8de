//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod command;
mod rbac;
mod user;

pub use command::{CommandAction, CommandParams, ParsedCommand};
pub use rbac::{NAME_MAX_LENGTH, PermissionId, PermissionName, RoleId, RoleName};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH, UserId, Username,
    validate_password,
};
