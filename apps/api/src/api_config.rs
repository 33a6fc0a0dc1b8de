use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use warden_core::AppError;
use warden_infrastructure::{
    DEFAULT_CREDENTIAL_LIFETIME, GeminiSettings, JWT_SECRET_MIN_LENGTH, parse_credential_lifetime,
};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_COMMAND_MODEL_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(AppError::Validation(format!(
                "APP_ENV must be either 'development' or 'production', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub app_env: AppEnvironment,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub gemini: GeminiSettings,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let app_env = env::var("APP_ENV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| AppEnvironment::parse(value.as_str()))
            .transpose()?
            .unwrap_or(AppEnvironment::Production);

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let jwt_secret = required_env("JWT_SECRET")?;
        if jwt_secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {JWT_SECRET_MIN_LENGTH} characters"
            )));
        }

        let jwt_expiry = env::var("JWT_EXPIRY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_credential_lifetime(value.as_str()))
            .transpose()
            .map_err(|error| AppError::Validation(format!("invalid JWT_EXPIRY: {}", error.message())))?
            .unwrap_or(DEFAULT_CREDENTIAL_LIFETIME);

        let timeout_seconds = match env::var("COMMAND_MODEL_TIMEOUT_SECONDS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "COMMAND_MODEL_TIMEOUT_SECONDS must be a positive integer, got '{value}'"
                    ))
                })?,
            Err(_) => DEFAULT_COMMAND_MODEL_TIMEOUT_SECONDS,
        };

        let gemini = GeminiSettings {
            base_url: env::var("GEMINI_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE_URL.to_owned()),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_owned()),
            api_key: required_non_empty_env("GEMINI_API_KEY")?,
            timeout: Duration::from_secs(timeout_seconds),
        };

        Ok(Self {
            migrate_only,
            app_env,
            api_host,
            api_port,
            frontend_url,
            storage,
            jwt_secret,
            jwt_expiry,
            gemini,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    /// Internal error details reach response bodies only in development.
    pub fn exposes_internal_errors(&self) -> bool {
        self.app_env == AppEnvironment::Development
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
