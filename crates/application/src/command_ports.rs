//! Ports consumed by the command interpreter.

use async_trait::async_trait;

use warden_core::AppResult;

/// External text-generation capability that turns a prompt into raw text.
///
/// Failures, timeouts and non-success statuses are `AppError::Upstream`.
#[async_trait]
pub trait CommandModel: Send + Sync {
    /// Sends a prompt once and returns the generated text.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
