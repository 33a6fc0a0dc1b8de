//! In-memory RBAC store for local runs and router tests.
//!
//! A single lock guards every table so unique keys and cascades hold the
//! same way the relational schema enforces them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use warden_application::{
    AttachedPermission, CreatePermissionInput, NewUser, PERMISSION_NAME_TAKEN, PageRequest,
    PermissionDetail, PermissionRecord, PermissionRepository, PermissionRoleLink, ROLE_NAME_TAKEN,
    RoleDetail, RoleMember, RolePermissionRecord, RoleRecord, RoleRepository, RoleSummary,
    UpdatePermissionInput, UserRecord, UserRepository,
};
use warden_core::{AppError, AppResult};
use warden_domain::{EmailAddress, PermissionId, RoleId, RoleName, UserId, Username};

#[derive(Debug, Default)]
struct RbacTables {
    roles: Vec<RoleSummary>,
    permissions: Vec<PermissionRecord>,
    role_permissions: Vec<(RoleId, PermissionId, DateTime<Utc>)>,
    users: Vec<UserRecord>,
    user_roles: Vec<(UserId, RoleId, DateTime<Utc>)>,
}

impl RbacTables {
    fn role_record(&self, role: &RoleSummary) -> RoleRecord {
        let permissions = self
            .role_permissions
            .iter()
            .filter(|(role_id, _, _)| *role_id == role.id)
            .filter_map(|(_, permission_id, assigned_at)| {
                self.permission(*permission_id)
                    .map(|permission| AttachedPermission {
                        permission: permission.clone(),
                        assigned_at: *assigned_at,
                    })
            })
            .collect();

        RoleRecord {
            role: role.clone(),
            permissions,
        }
    }

    fn role(&self, role_id: RoleId) -> Option<&RoleSummary> {
        self.roles.iter().find(|role| role.id == role_id)
    }

    fn permission(&self, permission_id: PermissionId) -> Option<&PermissionRecord> {
        self.permissions
            .iter()
            .find(|permission| permission.id == permission_id)
    }

    fn role_names_for(&self, user_id: UserId) -> Vec<String> {
        let mut names: Vec<String> = self
            .user_roles
            .iter()
            .filter(|(assigned_user, _, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id, _)| self.role(*role_id).map(|role| role.name.clone()))
            .collect();
        names.sort();
        names
    }

    fn user_with_roles(&self, user: &UserRecord) -> UserRecord {
        UserRecord {
            roles: self.role_names_for(user.id),
            ..user.clone()
        }
    }
}

fn page_of<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    rows.iter()
        .skip(usize::try_from(page.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(page.take).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// In-memory implementation of the role, permission and user repositories.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    tables: RwLock<RbacTables>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a role to a user.
    ///
    /// Not reachable over HTTP; seeds role membership for local runs and tests.
    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        if tables.role(role_id).is_none() {
            return Err(AppError::NotFound("Role not found".to_owned()));
        }
        if !tables.users.iter().any(|user| user.id == user_id) {
            return Err(AppError::NotFound("User not found".to_owned()));
        }
        if tables
            .user_roles
            .iter()
            .any(|(assigned_user, assigned_role, _)| {
                *assigned_user == user_id && *assigned_role == role_id
            })
        {
            return Ok(());
        }

        tables.user_roles.push((user_id, role_id, Utc::now()));
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        let mut tables = self.tables.write().await;

        if tables.roles.iter().any(|role| role.name == name.as_str()) {
            return Err(AppError::Conflict(ROLE_NAME_TAKEN.to_owned()));
        }

        let now = Utc::now();
        let role = RoleSummary {
            id: RoleId::new(),
            name: name.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.roles.push(role.clone());

        Ok(RoleRecord {
            role,
            permissions: Vec::new(),
        })
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDetail>> {
        let tables = self.tables.read().await;

        let Some(role) = tables.role(role_id) else {
            return Ok(None);
        };

        let users = tables
            .user_roles
            .iter()
            .filter(|(_, assigned_role, _)| *assigned_role == role_id)
            .filter_map(|(user_id, _, assigned_at)| {
                tables
                    .users
                    .iter()
                    .find(|user| user.id == *user_id)
                    .map(|user| RoleMember {
                        user_id: user.id,
                        email: user.email.clone(),
                        username: user.username.clone(),
                        assigned_at: *assigned_at,
                    })
            })
            .collect();

        Ok(Some(RoleDetail {
            role: tables.role_record(role),
            users,
        }))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleSummary>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.iter().find(|role| role.name == name).cloned())
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<RoleRecord>> {
        let tables = self.tables.read().await;
        Ok(page_of(&tables.roles, page)
            .iter()
            .map(|role| tables.role_record(role))
            .collect())
    }

    async fn count_roles(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.roles.len() as u64)
    }

    async fn rename_role(&self, role_id: RoleId, name: &RoleName) -> AppResult<RoleRecord> {
        let mut tables = self.tables.write().await;

        if tables
            .roles
            .iter()
            .any(|role| role.id != role_id && role.name == name.as_str())
        {
            return Err(AppError::Conflict(ROLE_NAME_TAKEN.to_owned()));
        }

        let role = tables
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound("Role not found".to_owned()))?;
        role.name = name.as_str().to_owned();
        role.updated_at = Utc::now();
        let role = role.clone();

        Ok(tables.role_record(&role))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.roles.retain(|role| role.id != role_id);
        tables
            .role_permissions
            .retain(|(linked_role, _, _)| *linked_role != role_id);
        tables
            .user_roles
            .retain(|(_, assigned_role, _)| *assigned_role != role_id);
        Ok(())
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionRecord> {
        let mut tables = self.tables.write().await;

        let (Some(role), Some(permission)) = (
            tables.role(role_id).cloned(),
            tables.permission(permission_id).cloned(),
        ) else {
            return Err(AppError::NotFound("Role or permission not found".to_owned()));
        };

        if tables
            .role_permissions
            .iter()
            .any(|(linked_role, linked_permission, _)| {
                *linked_role == role_id && *linked_permission == permission_id
            })
        {
            return Err(AppError::Conflict(
                "Permission already attached to this role".to_owned(),
            ));
        }

        let assigned_at = Utc::now();
        tables
            .role_permissions
            .push((role_id, permission_id, assigned_at));

        Ok(RolePermissionRecord {
            role,
            permission,
            assigned_at,
        })
    }

    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.role_permissions.len();
        tables
            .role_permissions
            .retain(|(linked_role, linked_permission, _)| {
                !(*linked_role == role_id && *linked_permission == permission_id)
            });
        Ok(tables.role_permissions.len() != before)
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<PermissionRecord> {
        let mut tables = self.tables.write().await;

        if tables
            .permissions
            .iter()
            .any(|permission| permission.name == input.name.as_str())
        {
            return Err(AppError::Conflict(PERMISSION_NAME_TAKEN.to_owned()));
        }

        let now = Utc::now();
        let permission = PermissionRecord {
            id: PermissionId::new(),
            name: input.name.into(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        tables.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDetail>> {
        let tables = self.tables.read().await;

        let Some(permission) = tables.permission(permission_id) else {
            return Ok(None);
        };

        let roles = tables
            .role_permissions
            .iter()
            .filter(|(_, linked_permission, _)| *linked_permission == permission_id)
            .filter_map(|(role_id, _, assigned_at)| {
                tables.role(*role_id).map(|role| PermissionRoleLink {
                    role: role.clone(),
                    assigned_at: *assigned_at,
                })
            })
            .collect();

        Ok(Some(PermissionDetail {
            permission: permission.clone(),
            roles,
        }))
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .permissions
            .iter()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<PermissionRecord>> {
        Ok(page_of(&self.tables.read().await.permissions, page))
    }

    async fn count_permissions(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.permissions.len() as u64)
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        let mut tables = self.tables.write().await;

        if let Some(name) = &input.name
            && tables
                .permissions
                .iter()
                .any(|permission| permission.id != permission_id && permission.name == name.as_str())
        {
            return Err(AppError::Conflict(PERMISSION_NAME_TAKEN.to_owned()));
        }

        let permission = tables
            .permissions
            .iter_mut()
            .find(|permission| permission.id == permission_id)
            .ok_or_else(|| AppError::NotFound("Permission not found".to_owned()))?;

        if let Some(name) = input.name {
            permission.name = name.into();
        }
        if let Some(description) = input.description {
            permission.description = Some(description);
        }
        permission.updated_at = Utc::now();

        Ok(permission.clone())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .permissions
            .retain(|permission| permission.id != permission_id);
        tables
            .role_permissions
            .retain(|(_, linked_permission, _)| *linked_permission != permission_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRbacRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.email == email.as_str())
            .map(|user| tables.user_with_roles(user)))
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username.as_deref() == Some(username.as_str()))
            .map(|user| tables.user_with_roles(user)))
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .iter()
            .any(|existing| existing.email == user.email.as_str())
        {
            return Err(AppError::Conflict(
                "User with this email already exists".to_owned(),
            ));
        }
        if let Some(username) = &user.username
            && tables
                .users
                .iter()
                .any(|existing| existing.username.as_deref() == Some(username.as_str()))
        {
            return Err(AppError::Conflict(
                "User with this username already exists".to_owned(),
            ));
        }

        let record = UserRecord {
            id: UserId::new(),
            email: user.email.into(),
            username: user.username.map(|username| username.as_str().to_owned()),
            password_hash: user.password_hash,
            roles: Vec::new(),
        };
        tables.users.push(record.clone());
        Ok(record)
    }
}
