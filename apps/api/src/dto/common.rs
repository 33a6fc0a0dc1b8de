use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::PageRequest;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub storage: StorageStatusResponse,
}

/// Backing store check result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/storage-status-response.ts"
)]
pub struct StorageStatusResponse {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Generic message payload.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/message-response.ts"
)]
pub struct MessageResponse {
    pub message: String,
}

/// Pagination query for listings.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/list-query.ts"
)]
pub struct ListQuery {
    #[ts(optional)]
    pub skip: Option<u32>,
    #[ts(optional)]
    pub take: Option<u32>,
}

impl From<ListQuery> for PageRequest {
    fn from(value: ListQuery) -> Self {
        PageRequest::new(value.skip.map(u64::from), value.take.map(u64::from))
    }
}

/// Formats a timestamp the way clients receive every `*At` field.
pub(crate) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
