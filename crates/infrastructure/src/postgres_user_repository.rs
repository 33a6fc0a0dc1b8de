//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use warden_application::{NewUser, UserRecord, UserRepository};
use warden_core::{AppError, AppResult};
use warden_domain::{EmailAddress, UserId, Username};

use crate::postgres_errors::{map_query_error, map_write_error, violated_constraint};

const USERNAME_CONSTRAINT: &str = "users_username_key";

const SELECT_USER_WITH_ROLES: &str = r#"
    SELECT
        users.id,
        users.email,
        users.username,
        users.password_hash,
        COALESCE(
            array_agg(roles.name ORDER BY roles.name) FILTER (WHERE roles.name IS NOT NULL),
            ARRAY[]::TEXT[]
        ) AS roles
    FROM users
    LEFT JOIN user_roles
        ON user_roles.user_id = users.id
    LEFT JOIN roles
        ON roles.id = user_roles.role_id
"#;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, predicate: &str, value: &str) -> AppResult<Option<UserRecord>> {
        let query = format!("{SELECT_USER_WITH_ROLES} WHERE {predicate} GROUP BY users.id");

        let row = sqlx::query_as::<_, UserRow>(query.as_str())
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| map_query_error(error, "find user"))?;

        Ok(row.map(UserRecord::from))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    username: Option<String>,
    password_hash: String,
    roles: Vec<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            roles: row.roles,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InsertedUserRow {
    id: uuid::Uuid,
    email: String,
    username: Option<String>,
    password_hash: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        self.find_where("users.email = $1", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> AppResult<Option<UserRecord>> {
        self.find_where("users.username = $1", username.as_str())
            .await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, InsertedUserRow>(
            r#"
            INSERT INTO users (id, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, password_hash
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.email.as_str())
        .bind(user.username.as_ref().map(Username::as_str))
        .bind(user.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_conflict)?;

        Ok(UserRecord {
            id: UserId::from_uuid(row.id),
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            roles: Vec::new(),
        })
    }
}

fn map_user_conflict(error: sqlx::Error) -> AppError {
    let conflict = if violated_constraint(&error) == Some(USERNAME_CONSTRAINT) {
        "User with this username already exists"
    } else {
        "User with this email already exists"
    };

    map_write_error(error, "create user", conflict)
}
