use warden_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNDEFINED_TABLE: &str = "42P01";

/// Message returned when the schema has not been migrated.
pub(crate) const SCHEMA_MISSING: &str =
    "Database is not properly initialized. Please contact the administrator.";

fn database_code(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(database_error) => {
            database_error.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

pub(crate) fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
    match error {
        sqlx::Error::Database(database_error) => database_error.constraint(),
        _ => None,
    }
}

/// Maps a read failure. `action` completes "failed to ...".
pub(crate) fn map_query_error(error: sqlx::Error, action: &str) -> AppError {
    if database_code(&error).as_deref() == Some(UNDEFINED_TABLE) {
        return AppError::Unavailable(SCHEMA_MISSING.to_owned());
    }

    AppError::Internal(format!("failed to {action}: {error}"))
}

/// Maps a write failure, translating unique violations into `conflict`.
pub(crate) fn map_write_error(error: sqlx::Error, action: &str, conflict: &str) -> AppError {
    match database_code(&error).as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict(conflict.to_owned()),
        Some(FOREIGN_KEY_VIOLATION) => {
            AppError::NotFound("Role or permission not found".to_owned())
        }
        _ => map_query_error(error, action),
    }
}

pub(crate) fn to_sql_offset(value: u64, field: &str) -> Result<i64, AppError> {
    i64::try_from(value)
        .map_err(|_| AppError::Validation(format!("{field} must not exceed {}", i64::MAX)))
}

pub(crate) fn to_row_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
