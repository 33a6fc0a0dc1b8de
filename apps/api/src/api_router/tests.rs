use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;
use warden_application::CommandModel;
use warden_core::{AppError, AppResult};
use warden_domain::{RoleId, UserId};
use warden_infrastructure::{InMemoryRbacRepository, JwtCredentialService};

use crate::api_services::{StorageHandle, assemble_app_state};

use super::build_router;

const TEST_SECRET: &str = "router-test-secret-with-enough-length";

struct ScriptedModel {
    replies: Mutex<VecDeque<AppResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().await.push(prompt.to_owned());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Upstream("no scripted reply".to_owned())))
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryRbacRepository>,
    model: Arc<ScriptedModel>,
}

impl TestApp {
    fn new(replies: Vec<AppResult<String>>) -> Self {
        let store = Arc::new(InMemoryRbacRepository::new());
        let Ok(credentials) = JwtCredentialService::new(TEST_SECRET, Duration::from_secs(3600))
        else {
            panic!("test secret should be accepted");
        };
        let model = Arc::new(ScriptedModel {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        });
        let state = assemble_app_state(
            StorageHandle::Memory(store.clone()),
            Arc::new(credentials),
            model.clone(),
        );
        let Ok(router) = build_router(state, "http://localhost:3000", false) else {
            panic!("router should build");
        };

        Self {
            router,
            store,
            model,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request should build");
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("response body should be readable");
        };
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, payload)
    }

    async fn signup(&self, email: &str) -> (String, Value) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth",
                None,
                Some(json!({"action": "signup", "email": email, "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let token = body["token"].as_str().unwrap_or_default().to_owned();
        (token, body)
    }

    async fn create_role(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/roles",
                Some(token),
                Some(json!({"name": name})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap_or_default().to_owned()
    }

    async fn create_permission(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/permissions",
                Some(token),
                Some(json!({"name": name, "description": "test permission"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap_or_default().to_owned()
    }
}

fn fenced(text: &str) -> AppResult<String> {
    Ok(format!("```json\n{text}\n```"))
}

#[tokio::test]
async fn health_reports_in_memory_storage_ready() {
    let app = TestApp::new(Vec::new());

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["storage"]["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_bearer_credential() {
    let app = TestApp::new(Vec::new());

    let (missing, missing_body) = app.send(Method::GET, "/api/roles", None, None).await;
    let (invalid, invalid_body) = app
        .send(Method::GET, "/api/roles", Some("not-a-token"), None)
        .await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_body["error"], "missing bearer credential");
    assert_eq!(invalid, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid_body["error"], "invalid bearer credential");
}

#[tokio::test]
async fn parse_command_rejects_unauthenticated_callers_before_the_model() {
    let app = TestApp::new(vec![fenced(
        r#"{"action":"create_role","params":{"role_name":"Intruder"}}"#,
    )]);
    let command = json!({"command": "Create an Intruder role"});

    let (missing, _) = app
        .send(Method::POST, "/api/ai/parse-command", None, Some(command.clone()))
        .await;
    let (invalid, invalid_body) = app
        .send(
            Method::POST,
            "/api/ai/parse-command",
            Some("not-a-token"),
            Some(command),
        )
        .await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid, StatusCode::UNAUTHORIZED);
    assert!(invalid_body.get("parsed").is_none());
    assert!(app.model.prompts.lock().await.is_empty());

    let (token, _) = app.signup("ops@example.com").await;
    let (_, page) = app.send(Method::GET, "/api/roles", Some(&token), None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn signup_login_and_me_share_one_identity() {
    let app = TestApp::new(Vec::new());
    let (_, signup) = app.signup("Ops@Example.com").await;

    let (status, login) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({"action": "login", "email": "ops@example.com", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["id"], signup["user"]["id"]);

    let token = login["token"].as_str().unwrap_or_default();
    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["userId"], signup["user"]["id"]);
    assert_eq!(me["email"], "ops@example.com");
}

#[tokio::test]
async fn auth_rejects_unknown_action_duplicate_email_and_bad_password() {
    let app = TestApp::new(Vec::new());
    app.signup("ops@example.com").await;

    let (invalid, invalid_body) = app
        .send(Method::POST, "/api/auth", None, Some(json!({"action": "reset"})))
        .await;
    assert_eq!(invalid, StatusCode::BAD_REQUEST);
    assert_eq!(invalid_body["error"], "Invalid action");

    let (duplicate, duplicate_body) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({"action": "signup", "email": "ops@example.com", "password": "another pass"})),
        )
        .await;
    assert_eq!(duplicate, StatusCode::CONFLICT);
    assert_eq!(duplicate_body["error"], "User with this email already exists");

    let (wrong, wrong_body) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({"action": "login", "email": "ops@example.com", "password": "wrong password"})),
        )
        .await;
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn login_carries_assigned_role_names() -> AppResult<()> {
    let app = TestApp::new(Vec::new());
    let (token, signup) = app.signup("admin@example.com").await;
    let role_id = app.create_role(&token, "Admin").await;

    let user_id = uuid::Uuid::parse_str(signup["user"]["id"].as_str().unwrap_or_default())
        .map(UserId::from_uuid)
        .map_err(|error| AppError::Validation(error.to_string()))?;
    let role_id = RoleId::from_str(role_id.as_str())?;
    app.store.assign_role(user_id, role_id).await?;

    let (_, login) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({"action": "login", "email": "admin@example.com", "password": "correct horse"})),
        )
        .await;

    assert_eq!(login["user"]["roles"], json!(["Admin"]));
    Ok(())
}

#[tokio::test]
async fn role_lifecycle_round_trips_through_http() {
    let app = TestApp::new(Vec::new());
    let (token, _) = app.signup("ops@example.com").await;
    let role_id = app.create_role(&token, "Editor").await;

    let (status, page) = app
        .send(Method::GET, "/api/roles?skip=0&take=5", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["take"], 5);
    assert_eq!(page["data"][0]["name"], "Editor");

    let uri = format!("/api/roles/{role_id}");
    let (status, renamed) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({"name": "Chief Editor"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Chief Editor");

    let (status, detail) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["users"], json!([]));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, missing) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "Role not found");
}

#[tokio::test]
async fn duplicate_role_name_is_conflict_and_bad_id_is_validation() {
    let app = TestApp::new(Vec::new());
    let (token, _) = app.signup("ops@example.com").await;
    app.create_role(&token, "Editor").await;

    let (status, body) = app
        .send(Method::POST, "/api/roles", Some(&token), Some(json!({"name": "Editor"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Role with this name already exists");

    let (status, _) = app
        .send(Method::GET, "/api/roles/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_permission_attach_and_detach() {
    let app = TestApp::new(Vec::new());
    let (token, _) = app.signup("ops@example.com").await;
    let role_id = app.create_role(&token, "Editor").await;
    let permission_id = app.create_permission(&token, "Edit Articles").await;
    let uri = format!("/api/roles/{role_id}/permissions");

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "permissionId is required");

    let payload = json!({"permissionId": permission_id});
    let (status, link) = app
        .send(Method::POST, &uri, Some(&token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["role"]["name"], "Editor");
    assert_eq!(link["permission"]["name"], "Edit Articles");

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Permission already attached to this role");

    let (status, detail) = app
        .send(Method::GET, &format!("/api/permissions/{permission_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["roles"][0]["role"]["name"], "Editor");

    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&token), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send(Method::DELETE, &uri, Some(&token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Permission is not attached to this role");
}

#[tokio::test]
async fn permission_update_keeps_unspecified_fields() {
    let app = TestApp::new(Vec::new());
    let (token, _) = app.signup("ops@example.com").await;
    let permission_id = app.create_permission(&token, "posts.read").await;
    let uri = format!("/api/permissions/{permission_id}");

    let (status, updated) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({"name": "posts.view"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "posts.view");
    assert_eq!(updated["description"], "test permission");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn parse_command_creates_role_then_reports_conflict_with_parsed_intent() {
    let reply = r#"{"action":"create_role","params":{"role_name":"Manager","permission_name":null}}"#;
    let app = TestApp::new(vec![fenced(reply), fenced(reply)]);
    let (token, _) = app.signup("ops@example.com").await;
    let command = json!({"command": "Create a Manager role"});

    let (status, body) = app
        .send(Method::POST, "/api/ai/parse-command", Some(&token), Some(command.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["parsed"],
        json!({"action": "create_role", "params": {"role_name": "Manager", "permission_name": null}})
    );
    assert_eq!(body["result"]["name"], "Manager");

    let (status, body) = app
        .send(Method::POST, "/api/ai/parse-command", Some(&token), Some(command))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Role with this name already exists");
    assert_eq!(body["parsed"]["action"], "create_role");

    let (_, page) = app.send(Method::GET, "/api/roles", Some(&token), None).await;
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn parse_command_unparseable_reply_is_a_no_op() {
    let app = TestApp::new(vec![Ok("I am not sure what you mean.".to_owned())]);
    let (token, _) = app.signup("ops@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/parse-command",
            Some(&token),
            Some(json!({"command": "make it nice"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parsed"], json!({"action": "unknown", "params": {}}));
    assert_eq!(body["result"], json!({"message": "Command executed"}));
}

#[tokio::test]
async fn parse_command_upstream_failure_is_bad_gateway_without_parsed() {
    let app = TestApp::new(vec![Err(AppError::Upstream(
        "text generation returned status 503".to_owned(),
    ))]);
    let (token, _) = app.signup("ops@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/parse-command",
            Some(&token),
            Some(json!({"command": "Create admin role"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "text generation returned status 503");
    assert!(body.get("parsed").is_none());
}

#[tokio::test]
async fn parse_command_requires_text() {
    let app = TestApp::new(Vec::new());
    let (token, _) = app.signup("ops@example.com").await;

    let (status, body) = app
        .send(Method::POST, "/api/ai/parse-command", Some(&token), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "command is required");
}

#[tokio::test]
async fn parse_command_attach_resolves_name_fragments() {
    let reply = r#"Sure: {"action":"attach_permission","params":{"role_name":"edit","permission_name":"articles"}}"#;
    let app = TestApp::new(vec![Ok(reply.to_owned())]);
    let (token, _) = app.signup("ops@example.com").await;
    app.create_role(&token, "Editor").await;
    app.create_permission(&token, "Edit Articles").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/ai/parse-command",
            Some(&token),
            Some(json!({"command": "let editors edit articles"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["role"]["name"], "Editor");
    assert_eq!(body["result"]["permission"]["name"], "Edit Articles");
}
