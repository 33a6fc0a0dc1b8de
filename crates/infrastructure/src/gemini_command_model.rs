//! Gemini `generateContent` adapter for the command model port.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use warden_application::CommandModel;
use warden_core::{AppError, AppResult};

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// API key sent as the `key` query parameter. Never logged.
    pub api_key: String,
    /// Upper bound for one request, connect included.
    pub timeout: Duration,
}

/// Text generation through the Gemini REST API. One attempt per prompt.
pub struct GeminiCommandModel {
    http_client: reqwest::Client,
    endpoint: String,
}

impl GeminiCommandModel {
    /// Creates an adapter with a client bounded by `settings.timeout`.
    pub fn new(settings: GeminiSettings) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build text generation client: {error}"))
            })?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/models/{}:generateContent?key={}",
                settings.base_url.trim_end_matches('/'),
                settings.model,
                settings.api_key
            ),
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Shapes a `generateContent` body can take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateContentResponse {
    Error { error: Value },
    Candidates { candidates: Vec<Candidate> },
    Echo { contents: Vec<Content> },
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

fn first_text(content: Option<&Content>) -> Option<String> {
    content?
        .parts
        .first()?
        .text
        .clone()
        .filter(|text| !text.is_empty())
}

impl GenerateContentResponse {
    fn into_text(self) -> AppResult<String> {
        let text = match self {
            Self::Error { error } => {
                return Err(AppError::Upstream(format!(
                    "text generation returned an error: {error}"
                )));
            }
            Self::Candidates { candidates } => {
                first_text(candidates.first().and_then(|candidate| candidate.content.as_ref()))
            }
            Self::Echo { contents } => first_text(contents.first()),
        };

        text.ok_or_else(|| AppError::Upstream("text generation returned no content".to_owned()))
    }
}

#[async_trait]
impl CommandModel for GeminiCommandModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                let error = error.without_url();
                if error.is_timeout() {
                    AppError::Upstream("text generation request timed out".to_owned())
                } else {
                    AppError::Upstream(format!("text generation request failed: {error}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            debug!(status = status.as_u16(), detail = %detail, "text generation rejected request");
            return Err(AppError::Upstream(format!(
                "text generation returned status {}",
                status.as_u16()
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|error| {
                AppError::Upstream(format!(
                    "text generation returned an unreadable body: {}",
                    error.without_url()
                ))
            })?
            .into_text()
    }
}

#[cfg(test)]
mod tests;
