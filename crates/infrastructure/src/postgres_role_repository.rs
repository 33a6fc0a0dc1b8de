use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use warden_application::{
    AttachedPermission, PageRequest, PermissionRecord, RoleDetail, RoleMember,
    RolePermissionRecord, RoleRecord, RoleRepository, RoleSummary, ROLE_NAME_TAKEN,
};
use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, RoleId, RoleName, UserId};

use crate::postgres_errors::{map_query_error, map_write_error, to_row_count, to_sql_offset};

/// PostgreSQL-backed repository for roles and their permission attachments.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attached_permissions(
        &self,
        role_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<AttachedPermission>>> {
        let rows = sqlx::query_as::<_, AttachedPermissionRow>(
            r#"
            SELECT
                links.role_id,
                permissions.id AS permission_id,
                permissions.name,
                permissions.description,
                permissions.created_at,
                permissions.updated_at,
                links.assigned_at
            FROM role_permissions AS links
            INNER JOIN permissions
                ON permissions.id = links.permission_id
            WHERE links.role_id = ANY($1)
            ORDER BY links.assigned_at, permissions.id
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "list role permissions"))?;

        let mut grouped: HashMap<Uuid, Vec<AttachedPermission>> = HashMap::new();
        for row in rows {
            grouped.entry(row.role_id).or_default().push(AttachedPermission {
                permission: PermissionRecord {
                    id: PermissionId::from_uuid(row.permission_id),
                    name: row.name,
                    description: row.description,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                assigned_at: row.assigned_at,
            });
        }

        Ok(grouped)
    }

    async fn with_permissions(&self, rows: Vec<RoleRow>) -> AppResult<Vec<RoleRecord>> {
        let role_ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let mut permissions = self.attached_permissions(&role_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| RoleRecord {
                permissions: permissions.remove(&row.id).unwrap_or_default(),
                role: row.into(),
            })
            .collect())
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoleRow> for RoleSummary {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::from_uuid(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct AttachedPermissionRow {
    role_id: Uuid,
    permission_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assigned_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RoleMemberRow {
    user_id: Uuid,
    email: String,
    username: Option<String>,
    assigned_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: Uuid,
    role_name: String,
    role_created_at: DateTime<Utc>,
    role_updated_at: DateTime<Utc>,
    permission_id: Uuid,
    permission_name: String,
    permission_description: Option<String>,
    permission_created_at: DateTime<Utc>,
    permission_updated_at: DateTime<Utc>,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(RoleId::new().as_uuid())
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "create role", ROLE_NAME_TAKEN))?;

        Ok(RoleRecord {
            role: row.into(),
            permissions: Vec::new(),
        })
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDetail>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "find role"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let members = sqlx::query_as::<_, RoleMemberRow>(
            r#"
            SELECT
                users.id AS user_id,
                users.email,
                users.username,
                user_roles.assigned_at
            FROM user_roles
            INNER JOIN users
                ON users.id = user_roles.user_id
            WHERE user_roles.role_id = $1
            ORDER BY user_roles.assigned_at, users.id
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "list role members"))?;

        let role = self
            .with_permissions(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("role row vanished while loading".to_owned()))?;

        Ok(Some(RoleDetail {
            role,
            users: members
                .into_iter()
                .map(|member| RoleMember {
                    user_id: UserId::from_uuid(member.user_id),
                    email: member.email,
                    username: member.username,
                    assigned_at: member.assigned_at,
                })
                .collect(),
        }))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleSummary>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "find role by name"))?;

        Ok(row.map(RoleSummary::from))
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<RoleRecord>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM roles
            ORDER BY created_at, id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(to_sql_offset(page.skip, "skip")?)
        .bind(to_sql_offset(page.take, "take")?)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "list roles"))?;

        self.with_permissions(rows).await
    }

    async fn count_roles(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_query_error(error, "count roles"))?;

        Ok(to_row_count(count))
    }

    async fn rename_role(&self, role_id: RoleId, name: &RoleName) -> AppResult<RoleRecord> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "rename role", ROLE_NAME_TAKEN))?
        .ok_or_else(|| AppError::NotFound("Role not found".to_owned()))?;

        self.with_permissions(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("role row vanished while loading".to_owned()))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_query_error(error, "delete role"))?;

        Ok(())
    }

    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionRecord> {
        let row = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            WITH inserted AS (
                INSERT INTO role_permissions (role_id, permission_id)
                VALUES ($1, $2)
                RETURNING role_id, permission_id, assigned_at
            )
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                roles.created_at AS role_created_at,
                roles.updated_at AS role_updated_at,
                permissions.id AS permission_id,
                permissions.name AS permission_name,
                permissions.description AS permission_description,
                permissions.created_at AS permission_created_at,
                permissions.updated_at AS permission_updated_at,
                inserted.assigned_at
            FROM inserted
            INNER JOIN roles
                ON roles.id = inserted.role_id
            INNER JOIN permissions
                ON permissions.id = inserted.permission_id
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            map_write_error(
                error,
                "attach permission",
                "Permission already attached to this role",
            )
        })?;

        Ok(RolePermissionRecord {
            role: RoleSummary {
                id: RoleId::from_uuid(row.role_id),
                name: row.role_name,
                created_at: row.role_created_at,
                updated_at: row.role_updated_at,
            },
            permission: PermissionRecord {
                id: PermissionId::from_uuid(row.permission_id),
                name: row.permission_name,
                description: row.permission_description,
                created_at: row.permission_created_at,
                updated_at: row.permission_updated_at,
            },
            assigned_at: row.assigned_at,
        })
    }

    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND permission_id = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "detach permission"))?;

        Ok(result.rows_affected() > 0)
    }
}
