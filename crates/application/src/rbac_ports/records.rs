use chrono::{DateTime, Utc};

use warden_domain::{PermissionId, PermissionName, RoleId, UserId};

/// Default number of rows returned by a listing when `take` is omitted.
pub const DEFAULT_PAGE_TAKE: u64 = 10;

/// Offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of rows skipped.
    pub skip: u64,
    /// Maximum rows returned.
    pub take: u64,
}

impl PageRequest {
    /// Creates a request, defaulting `skip` to 0 and `take` to 10.
    #[must_use]
    pub fn new(skip: Option<u64>, take: Option<u64>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            take: take.unwrap_or(DEFAULT_PAGE_TAKE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a listing together with the full row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in this page.
    pub data: Vec<T>,
    /// Total rows across all pages.
    pub total: u64,
    /// Offset used for this page.
    pub skip: u64,
    /// Page size used for this page.
    pub take: u64,
}

/// Role fields without relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Permission fields without relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Unique permission name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Permission attached to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPermission {
    /// Attached permission.
    pub permission: PermissionRecord,
    /// Attachment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Role with its attached permissions, as returned by listings and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Role fields.
    pub role: RoleSummary,
    /// Attached permissions in attachment order.
    pub permissions: Vec<AttachedPermission>,
}

impl RoleRecord {
    /// Returns whether the permission is attached to this role.
    #[must_use]
    pub fn has_permission(&self, permission_id: PermissionId) -> bool {
        self.permissions
            .iter()
            .any(|attached| attached.permission.id == permission_id)
    }
}

/// User holding a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMember {
    /// Member identifier.
    pub user_id: UserId,
    /// Member email.
    pub email: String,
    /// Optional member username.
    pub username: Option<String>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Role with permissions and members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDetail {
    /// Role with attached permissions.
    pub role: RoleRecord,
    /// Users holding the role.
    pub users: Vec<RoleMember>,
}

/// Role a permission is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRoleLink {
    /// Role holding the permission.
    pub role: RoleSummary,
    /// Attachment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Permission with the roles it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDetail {
    /// Permission fields.
    pub permission: PermissionRecord,
    /// Roles holding the permission.
    pub roles: Vec<PermissionRoleLink>,
}

/// Role-permission association returned after attaching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionRecord {
    /// Role side of the association.
    pub role: RoleSummary,
    /// Permission side of the association.
    pub permission: PermissionRecord,
    /// Attachment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Input payload for creating permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Unique permission name.
    pub name: PermissionName,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update for a permission. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// Replacement name.
    pub name: Option<PermissionName>,
    /// Replacement description.
    pub description: Option<String>,
}
