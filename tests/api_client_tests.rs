// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API client and auth flow tests against a local stand-in backend.
//!
//! These tests verify that:
//! 1. Login/registration persist the session only on success
//! 2. The bearer token follows the session store
//! 3. Non-2xx responses are retried with a bounded linear backoff
//! 4. Profile updates send only the provided fields

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rehab_client::api::{ApiClient, AuthToken, RetryPolicy};
use rehab_client::error::AppError;
use rehab_client::models::{ProfileUpdate, RegisterRequest};
use rehab_client::services::AuthService;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::{api_for, jane, jane_json, memory_store, spawn_backend, test_config};

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Minimal platform backend: one account, token "abc123".
fn platform_backend(last_profile_body: Arc<Mutex<Option<Value>>>) -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "jane@x.com" && body["password"] == "secret" {
                    (
                        StatusCode::OK,
                        Json(json!({ "user": jane_json(), "token": "abc123" })),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "Invalid credentials" })),
                    )
                }
            }),
        )
        .route(
            "/api/auth/register",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "jane@x.com" {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "Email already registered" })),
                    );
                }
                let mut user = jane_json();
                user["id"] = json!(8);
                user["email"] = body["email"].clone();
                user["name"] = body["name"].clone();
                user["role"] = body["role"].clone();
                (
                    StatusCode::CREATED,
                    Json(json!({ "user": user, "token": "new-token" })),
                )
            }),
        )
        .route(
            "/api/users/me",
            get(|headers: HeaderMap| async move {
                match bearer(&headers).as_deref() {
                    Some("abc123") => (StatusCode::OK, Json(jane_json())),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "Authentication required" })),
                    ),
                }
            })
            .put(
                |State(last): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    let mut user = jane_json();
                    if let Some(name) = body.get("name") {
                        user["name"] = name.clone();
                    }
                    *last.lock().unwrap() = Some(body);
                    Json(user)
                },
            ),
        )
        .with_state(last_profile_body)
}

async fn auth_fixture() -> (
    AuthService,
    Arc<rehab_client::session::SessionStore>,
    Arc<rehab_client::session::MemoryBackend>,
    Arc<Mutex<Option<Value>>>,
) {
    let last_body = Arc::new(Mutex::new(None));
    let base_url = spawn_backend(platform_backend(last_body.clone())).await;
    let (store, backend) = memory_store().await;
    let api = api_for(&base_url, &store);
    (AuthService::new(api, store.clone()), store, backend, last_body)
}

#[tokio::test]
async fn test_login_saves_session_and_authorizes_next_request() {
    let (auth, store, backend, _) = auth_fixture().await;

    let user = auth.login("jane@x.com", "secret").await.unwrap();
    assert_eq!(user.name, "Jane Doe");
    assert_eq!(user.assigned_expert_id, Some(3));

    assert!(store.is_logged_in());
    assert_eq!(store.current_token().as_deref(), Some("abc123"));
    let persisted = backend.persisted();
    assert_eq!(persisted.user_id.as_deref(), Some("7"));
    assert_eq!(persisted.user_role.as_deref(), Some("patient"));

    // Token is picked up by the transport without any extra wiring.
    let me = auth.current_user().await.unwrap();
    assert_eq!(me.email, "jane@x.com");
}

#[tokio::test]
async fn test_rejected_login_stays_logged_out() {
    let (auth, store, _, _) = auth_fixture().await;

    let err = auth.login("jane@x.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn test_login_storage_failure_is_reported() {
    let (auth, store, backend, _) = auth_fixture().await;
    backend.set_fail_writes(true);

    let err = auth.login("jane@x.com", "secret").await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(!store.is_logged_in());
    assert_eq!(store.current_token(), None);
}

#[tokio::test]
async fn test_invalid_login_input_is_rejected_locally() {
    let (auth, store, _, _) = auth_fixture().await;

    let err = auth.login("not-an-email", "secret").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn test_register_saves_new_session() {
    let (auth, store, _, _) = auth_fixture().await;

    let user = auth
        .register(RegisterRequest::patient("sam@x.com", "secret1", "Sam Patient"))
        .await
        .unwrap();

    assert_eq!(user.id, 8);
    assert_eq!(user.role, "patient");
    assert_eq!(store.current_token().as_deref(), Some("new-token"));
    assert_eq!(store.identity().await.name.as_deref(), Some("Sam Patient"));
}

#[tokio::test]
async fn test_register_conflict_surfaces_server_message() {
    let (auth, store, _, _) = auth_fixture().await;

    let err = auth
        .register(RegisterRequest::patient("jane@x.com", "secret1", "Jane Doe"))
        .await
        .unwrap_err();

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Email already registered");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn test_logout_then_request_is_unauthorized() {
    let (auth, store, _, _) = auth_fixture().await;
    auth.login("jane@x.com", "secret").await.unwrap();

    auth.logout().await.unwrap();

    assert!(!store.is_logged_in());
    assert_eq!(store.identity().await.name.as_deref(), Some("Jane Doe"));
    let err = auth.current_user().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn test_profile_update_sends_only_set_fields() {
    let (auth, store, _, last_body) = auth_fixture().await;
    store.save_session("abc123", &jane()).await.unwrap();

    let update = ProfileUpdate {
        name: Some("Jane Q. Doe".to_string()),
        ..Default::default()
    };
    let user = auth.update_profile(&update).await.unwrap();

    assert_eq!(user.name, "Jane Q. Doe");
    assert_eq!(
        last_body.lock().unwrap().clone(),
        Some(json!({ "name": "Jane Q. Doe" }))
    );
    assert_eq!(
        store.identity().await.name.as_deref(),
        Some("Jane Q. Doe")
    );

    let err = auth
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// ─── Retry middleware ───────────────────────────────────────────

/// Fails with `status` for the first `failures` hits, then returns `[]`.
fn flaky_backend(failures: usize, status: StatusCode, hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/api/categories",
        get(move || {
            let hits = hits.clone();
            async move {
                let n = hits.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    (status, "")
                } else {
                    (StatusCode::OK, "[]")
                }
            }
        }),
    )
}

fn retrying_client(base_url: &str, max_retries: u32) -> ApiClient {
    ApiClient::new(&test_config(base_url), AuthToken::anonymous())
        .unwrap()
        .with_retry(RetryPolicy {
            max_retries,
            step: Duration::from_millis(10),
        })
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url =
        spawn_backend(flaky_backend(2, StatusCode::INTERNAL_SERVER_ERROR, hits.clone())).await;

    let categories = retrying_client(&base_url, 3).categories().await.unwrap();

    assert!(categories.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_are_bounded_and_final_response_surfaces() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url =
        spawn_backend(flaky_backend(usize::MAX, StatusCode::SERVICE_UNAVAILABLE, hits.clone()))
            .await;
    let client = retrying_client(&base_url, 2);

    let err = client.categories().await.unwrap_err();
    assert!(matches!(err, AppError::Api { status: 503, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 3, "one attempt plus two retries");

    // The probe sees one logical result for the same physical attempts.
    use rehab_client::connectivity::Probe;
    assert_eq!(client.probe().await, Ok(503));
    assert_eq!(hits.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let base_url = common::closed_port_url().await;
    let client = retrying_client(&base_url, 3);

    let err = client.categories().await.unwrap_err();
    assert!(err.is_network());
}
