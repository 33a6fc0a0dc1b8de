use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use warden_core::{AppError, AppResult, UserIdentity};
use warden_domain::{EmailAddress, PermissionId, RoleId, RoleName, UserId, Username};

use crate::{
    AttachedPermission, CommandModel, CreatePermissionInput, CredentialService, IssueCredential,
    NewUser, PageRequest, PasswordHasher, PermissionDetail, PermissionRecord,
    PermissionRepository, PermissionRoleLink, RoleDetail, RolePermissionRecord, RoleRecord,
    RoleRepository, RoleSummary, UpdatePermissionInput, UserRecord, UserRepository,
};

#[derive(Default)]
struct RbacState {
    roles: Vec<RoleSummary>,
    permissions: Vec<PermissionRecord>,
    links: Vec<(RoleId, PermissionId, chrono::DateTime<Utc>)>,
}

impl RbacState {
    fn role_record(&self, role: &RoleSummary) -> RoleRecord {
        let permissions = self
            .links
            .iter()
            .filter(|(role_id, _, _)| *role_id == role.id)
            .filter_map(|(_, permission_id, assigned_at)| {
                self.permissions
                    .iter()
                    .find(|permission| permission.id == *permission_id)
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
}

fn page_slice<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(page.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(page.take).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// Role and permission store enforcing the same unique keys as storage.
#[derive(Default)]
pub(crate) struct FakeRbacStore {
    state: Mutex<RbacState>,
}

impl FakeRbacStore {
    pub(crate) async fn link_count(&self) -> usize {
        self.state.lock().await.links.len()
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        let mut state = self.state.lock().await;
        if state.roles.iter().any(|role| role.name == name.as_str()) {
            return Err(AppError::Conflict(
                "Role with this name already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let role = RoleSummary {
            id: RoleId::new(),
            name: name.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.roles.push(role.clone());

        Ok(RoleRecord {
            role,
            permissions: Vec::new(),
        })
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDetail>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .map(|role| RoleDetail {
                role: state.role_record(role),
                users: Vec::new(),
            }))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleSummary>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|role| role.name == name).cloned())
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<RoleRecord>> {
        let state = self.state.lock().await;
        Ok(page_slice(&state.roles, page)
            .iter()
            .map(|role| state.role_record(role))
            .collect())
    }

    async fn count_roles(&self) -> AppResult<u64> {
        Ok(self.state.lock().await.roles.len() as u64)
    }

    async fn rename_role(&self, role_id: RoleId, name: &RoleName) -> AppResult<RoleRecord> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound("Role not found".to_owned()))?;
        role.name = name.as_str().to_owned();
        role.updated_at = Utc::now();
        let role = role.clone();

        Ok(state.role_record(&role))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.roles.retain(|role| role.id != role_id);
        state.links.retain(|(linked_role, _, _)| *linked_role != role_id);
        Ok(())
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionRecord> {
        let mut state = self.state.lock().await;
        if state
            .links
            .iter()
            .any(|(linked_role, linked_permission, _)| {
                *linked_role == role_id && *linked_permission == permission_id
            })
        {
            return Err(AppError::Conflict(
                "Permission already attached to this role".to_owned(),
            ));
        }

        let role = state.roles.iter().find(|role| role.id == role_id).cloned();
        let permission = state
            .permissions
            .iter()
            .find(|permission| permission.id == permission_id)
            .cloned();
        let (Some(role), Some(permission)) = (role, permission) else {
            return Err(AppError::NotFound("Role or permission not found".to_owned()));
        };

        let assigned_at = Utc::now();
        state.links.push((role_id, permission_id, assigned_at));

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
        let mut state = self.state.lock().await;
        let before = state.links.len();
        state.links.retain(|(linked_role, linked_permission, _)| {
            !(*linked_role == role_id && *linked_permission == permission_id)
        });
        Ok(state.links.len() != before)
    }
}

#[async_trait]
impl PermissionRepository for FakeRbacStore {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<PermissionRecord> {
        let mut state = self.state.lock().await;
        if state
            .permissions
            .iter()
            .any(|permission| permission.name == input.name.as_str())
        {
            return Err(AppError::Conflict(
                "Permission with this name already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let permission = PermissionRecord {
            id: PermissionId::new(),
            name: input.name.into(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        state.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDetail>> {
        let state = self.state.lock().await;
        let Some(permission) = state
            .permissions
            .iter()
            .find(|permission| permission.id == permission_id)
        else {
            return Ok(None);
        };

        let roles = state
            .links
            .iter()
            .filter(|(_, linked_permission, _)| *linked_permission == permission_id)
            .filter_map(|(role_id, _, assigned_at)| {
                state
                    .roles
                    .iter()
                    .find(|role| role.id == *role_id)
                    .map(|role| PermissionRoleLink {
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
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.name == name)
            .cloned())
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<PermissionRecord>> {
        Ok(page_slice(&self.state.lock().await.permissions, page))
    }

    async fn count_permissions(&self) -> AppResult<u64> {
        Ok(self.state.lock().await.permissions.len() as u64)
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        let mut state = self.state.lock().await;
        let permission = state
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
        let mut state = self.state.lock().await;
        state
            .permissions
            .retain(|permission| permission.id != permission_id);
        state
            .links
            .retain(|(_, linked_permission, _)| *linked_permission != permission_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|user| user.email == email.as_str())
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<UserRecord>> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|user| user.username.as_deref() == Some(username.as_str()))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let record = UserRecord {
            id: UserId::new(),
            email: user.email.into(),
            username: user.username.map(|username| username.as_str().to_owned()),
            password_hash: user.password_hash,
            roles: Vec::new(),
        };
        self.users.lock().await.push(record.clone());
        Ok(record)
    }
}

/// Reversible stand-in hasher that counts hash calls.
#[derive(Default)]
pub(crate) struct FakePasswordHasher {
    pub(crate) hash_calls: std::sync::atomic::AtomicUsize,
}

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hash_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Issues `token|<user id>|<email>|<roles>` strings.
pub(crate) struct FakeCredentialService;

impl CredentialService for FakeCredentialService {
    fn issue(&self, credential: &IssueCredential) -> AppResult<String> {
        Ok(format!(
            "token|{}|{}|{}",
            credential.user_id,
            credential.email,
            credential.roles.join(",")
        ))
    }

    fn verify(&self, token: &str) -> AppResult<UserIdentity> {
        let mut parts = token.split('|');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("token"), Some(subject), Some(email), Some(roles)) => Ok(UserIdentity::new(
                subject,
                email,
                roles
                    .split(',')
                    .filter(|role| !role.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
            _ => Err(AppError::Unauthorized("invalid bearer credential".to_owned())),
        }
    }
}

/// Replays canned model replies and records every prompt it receives.
pub(crate) struct ScriptedCommandModel {
    replies: Mutex<VecDeque<AppResult<String>>>,
    pub(crate) prompts: Mutex<Vec<String>>,
}

impl ScriptedCommandModel {
    pub(crate) fn new(replies: Vec<AppResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CommandModel for ScriptedCommandModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().await.push(prompt.to_owned());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Upstream("no scripted reply left".to_owned())))
    }
}

pub(crate) fn operator() -> UserIdentity {
    UserIdentity::new("operator-1", "ops@example.com", vec!["Admin".to_owned()])
}
