use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use warden_application::CommandModel;
use warden_core::AppError;

use super::{GeminiCommandModel, GeminiSettings, GenerateContentResponse};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| panic!("test"));
    let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{address}/v1beta")
}

fn model(base_url: String, timeout: Duration) -> GeminiCommandModel {
    GeminiCommandModel::new(GeminiSettings {
        base_url,
        model: "gemini-test".to_owned(),
        api_key: "test-key".to_owned(),
        timeout,
    })
    .unwrap_or_else(|_| panic!("test"))
}

fn decode(body: Value) -> GenerateContentResponse {
    serde_json::from_value(body).unwrap_or_else(|_| panic!("test"))
}

#[test]
fn candidate_text_is_extracted() {
    let response = decode(json!({
        "candidates": [{"content": {"parts": [{"text": "{\"action\":\"unknown\"}"}]}}]
    }));

    assert!(matches!(response.into_text(), Ok(text) if text == "{\"action\":\"unknown\"}"));
}

#[test]
fn echoed_contents_are_accepted() {
    let response = decode(json!({"contents": [{"parts": [{"text": "hello"}]}]}));

    assert!(matches!(response.into_text(), Ok(text) if text == "hello"));
}

#[test]
fn error_body_is_upstream_failure() {
    let response = decode(json!({"error": {"code": 400, "message": "API key not valid"}}));

    assert!(matches!(response.into_text(), Err(AppError::Upstream(message)) if message.contains("API key not valid")));
}

#[test]
fn empty_candidates_report_no_content() {
    let response = decode(json!({"candidates": []}));

    assert!(matches!(
        response.into_text(),
        Err(AppError::Upstream(message)) if message == "text generation returned no content"
    ));
}

#[tokio::test]
async fn generate_posts_prompt_to_model_endpoint() {
    let router = Router::new().route(
        "/v1beta/models/{model}",
        post(
            |Path(model): Path<String>,
             Query(query): Query<Vec<(String, String)>>,
             Json(body): Json<Value>| async move {
                let prompt = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_owned();
                let key = query
                    .into_iter()
                    .find(|(name, _)| name == "key")
                    .map(|(_, value)| value)
                    .unwrap_or_default();
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": format!("{model}|{key}|{prompt}")}]}}]
                }))
            },
        ),
    );
    let model = model(serve(router).await, Duration::from_secs(5));

    let text = model.generate("Create admin role").await;

    assert!(matches!(
        text,
        Ok(text) if text == "gemini-test:generateContent|test-key|Create admin role"
    ));
}

#[tokio::test]
async fn non_success_status_is_upstream_with_code() {
    let router = Router::new().route(
        "/v1beta/models/{model}",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, Json(json!({"error": {"code": 429}}))) }),
    );
    let model = model(serve(router).await, Duration::from_secs(5));

    let result = model.generate("Create admin role").await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "text generation returned status 429"
    ));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let router = Router::new().route(
        "/v1beta/models/{model}",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"candidates": []}))
        }),
    );
    let model = model(serve(router).await, Duration::from_millis(100));

    let result = model.generate("Create admin role").await;

    assert!(matches!(
        result,
        Err(AppError::Upstream(message)) if message == "text generation request timed out"
    ));
}
