//! Role and permission identifiers and validated names.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::{AppError, AppResult};

/// Maximum stored length of a role or permission name.
pub const NAME_MAX_LENGTH: usize = 255;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|_| {
                    AppError::Validation(format!(concat!("invalid ", $label, " id '{}'"), value))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a role record.
    RoleId,
    "role"
);

uuid_identifier!(
    /// Unique identifier for a permission record.
    PermissionId,
    "permission"
);

fn validated_name(value: String, required_message: &str, label: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(required_message.to_owned()));
    }

    if trimmed.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{label} name must not exceed {NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Validated role name. Uniqueness is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a trimmed, non-empty role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validated_name(value.into(), "Role name is required", "role").map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Validated permission name. Uniqueness is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionName(String);

impl PermissionName {
    /// Creates a trimmed, non-empty permission name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validated_name(value.into(), "Permission name is required", "permission").map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use warden_core::AppError;

    use super::{NAME_MAX_LENGTH, PermissionName, RoleId, RoleName};

    #[test]
    fn role_name_is_trimmed() {
        let name = RoleName::new("  Editor ");
        assert_eq!(name.ok().map(String::from).as_deref(), Some("Editor"));
    }

    #[test]
    fn blank_role_name_reports_required() {
        let result = RoleName::new("   ");
        assert!(
            matches!(result, Err(AppError::Validation(message)) if message == "Role name is required")
        );
    }

    #[test]
    fn blank_permission_name_reports_required() {
        let result = PermissionName::new("");
        assert!(
            matches!(result, Err(AppError::Validation(message)) if message == "Permission name is required")
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        assert!(RoleName::new("r".repeat(NAME_MAX_LENGTH + 1)).is_err());
        assert!(RoleName::new("r".repeat(NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn role_id_parses_its_display_form() {
        let role_id = RoleId::new();
        let parsed = RoleId::from_str(role_id.to_string().as_str());
        assert_eq!(parsed.ok(), Some(role_id));
    }

    #[test]
    fn malformed_role_id_is_a_validation_error() {
        assert!(matches!(
            RoleId::from_str("not-a-uuid"),
            Err(AppError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn accepted_names_never_carry_outer_whitespace(raw in "\\PC{0,40}") {
            if let Ok(name) = PermissionName::new(raw.clone()) {
                prop_assert_eq!(name.as_str(), raw.trim());
                prop_assert!(!name.as_str().is_empty());
            }
        }
    }
}
