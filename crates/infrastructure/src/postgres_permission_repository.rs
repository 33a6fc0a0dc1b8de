use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use warden_application::{
    CreatePermissionInput, PERMISSION_NAME_TAKEN, PageRequest, PermissionDetail,
    PermissionRecord, PermissionRepository, PermissionRoleLink, RoleSummary,
    UpdatePermissionInput,
};
use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, RoleId};

use crate::postgres_errors::{map_query_error, map_write_error, to_row_count, to_sql_offset};

/// PostgreSQL-backed repository for permissions.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PermissionRow> for PermissionRecord {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: PermissionId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRoleRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<PermissionRecord> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(PermissionId::new().as_uuid())
        .bind(input.name.as_str())
        .bind(input.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "create permission", PERMISSION_NAME_TAKEN))?;

        Ok(row.into())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDetail>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "find permission"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, PermissionRoleRow>(
            r#"
            SELECT
                roles.id,
                roles.name,
                roles.created_at,
                roles.updated_at,
                links.assigned_at
            FROM role_permissions AS links
            INNER JOIN roles
                ON roles.id = links.role_id
            WHERE links.permission_id = $1
            ORDER BY links.assigned_at, roles.id
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "list permission roles"))?;

        Ok(Some(PermissionDetail {
            permission: row.into(),
            roles: roles
                .into_iter()
                .map(|role| PermissionRoleLink {
                    role: RoleSummary {
                        id: RoleId::from_uuid(role.id),
                        name: role.name,
                        created_at: role.created_at,
                        updated_at: role.updated_at,
                    },
                    assigned_at: role.assigned_at,
                })
                .collect(),
        }))
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "find permission by name"))?;

        Ok(row.map(PermissionRecord::from))
    }

    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM permissions
            ORDER BY created_at, id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(to_sql_offset(page.skip, "skip")?)
        .bind(to_sql_offset(page.take, "take")?)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_query_error(error, "list permissions"))?;

        Ok(rows.into_iter().map(PermissionRecord::from).collect())
    }

    async fn count_permissions(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_query_error(error, "count permissions"))?;

        Ok(to_row_count(count))
    }

    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            UPDATE permissions
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(permission_id.as_uuid())
        .bind(input.name.as_ref().map(|name| name.as_str()))
        .bind(input.description.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "update permission", PERMISSION_NAME_TAKEN))?
        .ok_or_else(|| AppError::NotFound("Permission not found".to_owned()))?;

        Ok(row.into())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_query_error(error, "delete permission"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
