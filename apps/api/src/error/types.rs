use serde::Serialize;
use ts_rs::TS;

use crate::dto::ParsedCommandResponse;

/// API error payload.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    /// Intent the command interpreter recovered before failing.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    parsed: Option<ParsedCommandResponse>,
}

impl ErrorResponse {
    pub(super) fn new(error: String, parsed: Option<ParsedCommandResponse>) -> Self {
        Self { error, parsed }
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        self.error.as_str()
    }
}

/// Detailed body for an internal error, swapped in by development builds.
#[derive(Debug, Clone)]
pub struct RevealedError(pub ErrorResponse);
