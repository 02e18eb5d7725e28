//! HTTP-level tests for the records API.
//!
//! Covers:
//!   - Polymorphic fields surviving a POST/GET round trip as structured JSON
//!   - Required-field validation: 400 with field codes, nothing persisted
//!   - Identity spoofing rejection and server-stamped ownership
//!   - Org scoping (cross-org 404) and owner policies (403 vs concealed 404)
//!   - Pagination defaults and clamping
//!   - Weak task-spec references and run immutability

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use promptdeck_core::auth::bearer_token;
use promptdeck_core::{Authenticator, Identity, Module, ServiceError};
use promptdeck_sql::{SQLStore, SqliteStore};
use records::RecordsModule;

// =====================================================================
// Helpers
// =====================================================================

/// Resolves bearer tokens from a fixed table. Unknown tokens resolve to
/// nobody, like an expired JWT would.
struct TokenAuth(HashMap<String, Identity>);

impl Authenticator for TokenAuth {
    fn identify(&self, headers: &HeaderMap) -> Result<Option<Identity>, ServiceError> {
        Ok(bearer_token(headers).and_then(|t| self.0.get(t)).cloned())
    }
}

/// Fresh in-memory service with two known users.
fn service() -> axum::Router {
    let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let tokens = [
        ("alice-token", "user-alice", "Alice"),
        ("bob-token", "user-bob", "Bob"),
    ];
    let auth = TokenAuth(
        tokens
            .iter()
            .map(|(t, id, name)| {
                (
                    t.to_string(),
                    Identity {
                        id: id.to_string(),
                        name: name.to_string(),
                    },
                )
            })
            .collect(),
    );
    RecordsModule::new(db, Arc::new(auth)).unwrap().routes()
}

async fn api(
    router: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

fn spec_body() -> Value {
    json!({
        "family": "write",
        "goal": "g",
        "inputs": {"a": 1},
        "constraints": {"b": 2},
        "acceptanceCriteria": {"c": 3},
    })
}

/// POST a task spec as `token` and return its id.
async fn seed_spec(router: &axum::Router, token: &str, body: Value) -> i64 {
    let (s, json) = api(router, "POST", "/task-specs", Some(token), Some(body)).await;
    assert_eq!(s, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}

// =====================================================================
// Task specs
// =====================================================================

#[tokio::test]
async fn task_spec_create_returns_decoded_fields() {
    let r = service();
    let (s, json) = api(&r, "POST", "/task-specs", Some("alice-token"), Some(spec_body())).await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(json["family"], "write");
    assert_eq!(json["inputs"], json!({"a": 1}));
    assert_eq!(json["userId"], "user-alice");
    assert_eq!(json["orgId"], 1);
    assert_eq!(json["privacy"], Value::Null);
}

#[tokio::test]
async fn task_spec_round_trips_structured_values() {
    let r = service();
    let body = json!({
        "family": "analyze",
        "goal": "nested payloads",
        "inputs": {"rows": [1, 2.5, "three", null, {"k": true}]},
        "constraints": ["no external calls", {"ms": 250}],
        "acceptanceCriteria": "all rows classified",
        "privacy": {"pii": false},
    });
    let id = seed_spec(&r, "alice-token", body).await;

    let (s, json) = api(&r, "GET", &format!("/task-specs/{id}"), None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(
        json["inputs"],
        json!({"rows": [1, 2.5, "three", null, {"k": true}]})
    );
    assert_eq!(json["constraints"], json!(["no external calls", {"ms": 250}]));
    // A bare string is still a structured value and must come back typed.
    assert_eq!(json["acceptanceCriteria"], "all rows classified");
    assert_eq!(json["privacy"], json!({"pii": false}));
}

#[tokio::test]
async fn task_spec_missing_fields_rejected_in_order() {
    let r = service();
    let (s, json) = api(&r, "POST", "/task-specs", Some("alice-token"), Some(json!({}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(json["error"], "Goal is required");

    let (s, json) = api(
        &r,
        "POST",
        "/task-specs",
        Some("alice-token"),
        Some(json!({
            "family": "poetry",
            "goal": "g",
            "inputs": {},
            "constraints": {},
            "acceptanceCriteria": {},
        })),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_FAMILY");

    // Nothing was persisted by either attempt.
    let (s, json) = api(&r, "GET", "/task-specs", None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn identity_fields_in_body_rejected() {
    let r = service();
    for key in ["userId", "user_id", "authorId"] {
        let mut body = spec_body();
        body[key] = json!("user-mallory");
        let (s, json) = api(&r, "POST", "/task-specs", Some("alice-token"), Some(body)).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "USER_ID_NOT_ALLOWED");
    }

    // Ownership always comes from the token, never the body.
    let id = seed_spec(&r, "alice-token", spec_body()).await;
    let (_, json) = api(&r, "GET", &format!("/task-specs/{id}"), None, None).await;
    assert_eq!(json["userId"], "user-alice");
}

#[tokio::test]
async fn task_spec_create_requires_identity() {
    let r = service();
    let (s, json) = api(&r, "POST", "/task-specs", None, Some(spec_body())).await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (s, _) = api(&r, "POST", "/task-specs", Some("expired"), Some(spec_body())).await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_spec_update_applies_partial_patch() {
    let r = service();
    let id = seed_spec(&r, "alice-token", spec_body()).await;

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/task-specs/{id}"),
        Some("alice-token"),
        Some(json!({"goal": "sharper goal", "context": "for the blog", "ignoredKey": 1})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["goal"], "sharper goal");
    assert_eq!(json["context"], "for the blog");
    // Untouched fields survive.
    assert_eq!(json["inputs"], json!({"a": 1}));

    // Null clears an optional column.
    let (s, json) = api(
        &r,
        "PUT",
        &format!("/task-specs/{id}"),
        Some("alice-token"),
        Some(json!({"context": null})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["context"], Value::Null);
}

#[tokio::test]
async fn task_spec_conceals_other_owners_records() {
    let r = service();
    let id = seed_spec(&r, "alice-token", spec_body()).await;

    // Bob is in the same org. He can read, but mutation looks like 404,
    // not 403 — existence of someone else's spec is not confirmed.
    let (s, _) = api(&r, "GET", &format!("/task-specs/{id}"), Some("bob-token"), None).await;
    assert_eq!(s, StatusCode::OK);

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/task-specs/{id}"),
        Some("bob-token"),
        Some(json!({"goal": "mine now"})),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (s, _) = api(
        &r,
        "DELETE",
        &format!("/task-specs/{id}"),
        Some("bob-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cross_org_read_is_not_found() {
    let r = service();
    let mut body = spec_body();
    body["orgId"] = json!(2);
    let id = seed_spec(&r, "alice-token", body).await;

    // Default scope is org 1; the record lives in org 2.
    let (s, json) = api(&r, "GET", &format!("/task-specs/{id}"), None, None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (s, _) = api(&r, "GET", &format!("/task-specs/{id}?orgId=2"), None, None).await;
    assert_eq!(s, StatusCode::OK);
}

#[tokio::test]
async fn invalid_id_rejected_before_lookup() {
    let r = service();
    for uri in ["/task-specs/abc", "/task-specs/0", "/task-specs/-3"] {
        let (s, json) = api(&r, "GET", uri, None, None).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_ID");
        assert_eq!(json["error"], "Valid ID is required");
    }
}

#[tokio::test]
async fn malformed_body_and_query_still_use_error_envelope() {
    let r = service();

    let req = Request::builder()
        .method("POST")
        .uri("/task-specs")
        .header("authorization", "Bearer alice-token")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = r.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], "INVALID_BODY");
    assert_eq!(json["error"], "Request body must be valid JSON");

    let (s, json) = api(&r, "GET", "/task-specs?limit=abc", None, None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_QUERY");
    assert_eq!(json["error"], "Invalid query parameters");
}

#[tokio::test]
async fn update_refreshes_updated_at_and_keeps_created_at() {
    let r = service();
    let id = seed_spec(&r, "alice-token", spec_body()).await;
    let (_, before) = api(&r, "GET", &format!("/task-specs/{id}"), None, None).await;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let (s, after) = api(
        &r,
        "PUT",
        &format!("/task-specs/{id}"),
        Some("alice-token"),
        Some(json!({"goal": "sharper goal"})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
}

#[tokio::test]
async fn task_spec_delete_returns_snapshot_then_404() {
    let r = service();
    let id = seed_spec(&r, "alice-token", spec_body()).await;

    let (s, json) = api(
        &r,
        "DELETE",
        &format!("/task-specs/{id}"),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["message"], "Task spec deleted successfully");
    assert_eq!(json["record"]["id"], id);
    assert_eq!(json["record"]["inputs"], json!({"a": 1}));

    let (s, json) = api(
        &r,
        "DELETE",
        &format!("/task-specs/{id}"),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// =====================================================================
// Templates
// =====================================================================

#[tokio::test]
async fn template_requires_non_empty_tags() {
    let r = service();
    let (s, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "T", "tags": []})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_TAGS");

    let (s, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"tags": ["a"]})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_TITLE");
}

#[tokio::test]
async fn template_reference_must_exist_but_stays_weak() {
    let r = service();
    let (s, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "T", "tags": ["a"], "taskSpecId": 999})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_TASK_SPEC_ID");

    let spec_id = seed_spec(&r, "alice-token", spec_body()).await;
    let (s, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "T", "tags": ["a", "b"], "taskSpecId": spec_id})),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(json["tags"], json!(["a", "b"]));
    assert_eq!(json["proven"], false);
    let template_id = json["id"].as_i64().unwrap();

    // Same failure on the update path reports under its own code.
    let (s, err) = api(
        &r,
        "PUT",
        &format!("/templates/{template_id}"),
        Some("alice-token"),
        Some(json!({"taskSpecId": 999})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INVALID_TASK_SPEC");
    assert_eq!(err["error"], "Task spec not found");

    // Deleting the referenced spec leaves the template dangling, readable.
    let (s, _) = api(
        &r,
        "DELETE",
        &format!("/task-specs/{spec_id}"),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::OK);

    let (s, json) = api(&r, "GET", &format!("/templates/{template_id}"), None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["taskSpecId"], spec_id);
}

#[tokio::test]
async fn template_non_owner_mutation_forbidden() {
    let r = service();
    let (_, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "T", "tags": ["a"]})),
    )
    .await;
    let id = json["id"].as_i64().unwrap();

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/templates/{id}"),
        Some("bob-token"),
        Some(json!({"title": "Bob's"})),
    )
    .await;
    assert_eq!(s, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (s, _) = api(
        &r,
        "DELETE",
        &format!("/templates/{id}"),
        Some("bob-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::FORBIDDEN);

    // Org mismatch wins over ownership: same record probed from org 2.
    let (s, json) = api(
        &r,
        "PUT",
        &format!("/templates/{id}?orgId=2"),
        Some("bob-token"),
        Some(json!({"title": "Bob's"})),
    )
    .await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn template_update_and_tag_filter() {
    let r = service();
    let (_, json) = api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "Blog intro", "tags": ["writing", "blog"]})),
    )
    .await;
    let id = json["id"].as_i64().unwrap();
    api(
        &r,
        "POST",
        "/templates",
        Some("alice-token"),
        Some(json!({"title": "SQL helper", "tags": ["code"]})),
    )
    .await;

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/templates/{id}"),
        Some("alice-token"),
        Some(json!({"proven": true, "description": "works well"})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["proven"], true);
    assert_eq!(json["description"], "works well");

    let (s, json) = api(&r, "GET", "/templates?tag=blog", None, None).await;
    assert_eq!(s, StatusCode::OK);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Blog intro");

    let (_, json) = api(&r, "GET", "/templates?search=SQL", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

// =====================================================================
// Runs
// =====================================================================

fn run_body(spec_id: i64) -> Value {
    json!({
        "taskSpecId": spec_id,
        "model": "gpt-4o",
        "tokens": 1200,
        "costUsd": 0.018,
        "latencyMs": 900,
        "output": "done",
    })
}

#[tokio::test]
async fn run_create_validates_fields_and_reference() {
    let r = service();
    let (s, json) = api(
        &r,
        "POST",
        "/runs",
        Some("alice-token"),
        Some(json!({"model": "m"})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_TASK_SPEC_ID");

    let (s, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(run_body(999))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_TASK_SPEC");

    let spec_id = seed_spec(&r, "alice-token", spec_body()).await;
    let mut body = run_body(spec_id);
    body["tokens"] = json!(-1);
    let (s, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(body)).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_TOKENS");

    let mut body = run_body(spec_id);
    body["status"] = json!("bogus");
    let (s, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(body)).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATUS");
    assert_eq!(
        json["error"],
        "Status must be one of: queued, running, succeeded, failed"
    );

    let (s, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(run_body(spec_id))).await;
    assert_eq!(s, StatusCode::CREATED);
    assert_eq!(json["status"], "succeeded");
    assert_eq!(json["verdict"], Value::Null);
    assert_eq!(json["costUsd"], 0.018);
}

#[tokio::test]
async fn run_list_filters_and_rejects_bad_status() {
    let r = service();
    let spec_id = seed_spec(&r, "alice-token", spec_body()).await;

    let mut failed = run_body(spec_id);
    failed["status"] = json!("failed");
    failed["model"] = json!("claude-sonnet");
    api(&r, "POST", "/runs", Some("alice-token"), Some(failed)).await;
    api(&r, "POST", "/runs", Some("alice-token"), Some(run_body(spec_id))).await;

    let (s, json) = api(&r, "GET", "/runs?status=failed", None, None).await;
    assert_eq!(s, StatusCode::OK);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "failed");

    let (_, json) = api(&r, "GET", "/runs?model=sonnet", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    // Listing with a bad status is rejected and leaves data untouched.
    let (s, json) = api(&r, "GET", "/runs?status=bogus", None, None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATUS");
    let (_, json) = api(&r, "GET", "/runs", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn run_has_no_update_route() {
    let r = service();
    let spec_id = seed_spec(&r, "alice-token", spec_body()).await;
    let (_, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(run_body(spec_id))).await;
    let id = json["id"].as_i64().unwrap();

    let (s, _) = api(
        &r,
        "PUT",
        &format!("/runs/{id}"),
        Some("alice-token"),
        Some(json!({"status": "failed"})),
    )
    .await;
    assert_eq!(s, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn run_delete_returns_decoded_snapshot() {
    let r = service();
    let spec_id = seed_spec(&r, "alice-token", spec_body()).await;
    let mut body = run_body(spec_id);
    body["verdict"] = json!({"pass": true});
    let (_, json) = api(&r, "POST", "/runs", Some("alice-token"), Some(body)).await;
    let id = json["id"].as_i64().unwrap();

    let (s, _) = api(&r, "DELETE", &format!("/runs/{id}"), Some("bob-token"), None).await;
    assert_eq!(s, StatusCode::FORBIDDEN);

    let (s, json) = api(
        &r,
        "DELETE",
        &format!("/runs/{id}"),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["message"], "Run deleted successfully");
    assert_eq!(json["deletedRun"]["verdict"], json!({"pass": true}));
}

// =====================================================================
// Lessons
// =====================================================================

#[tokio::test]
async fn lesson_lifecycle() {
    let r = service();
    let (s, json) = api(
        &r,
        "POST",
        "/lessons",
        Some("alice-token"),
        Some(json!({
            "title": "Few-shot beats zero-shot here",
            "bullets": ["give two examples", "keep them short"],
            "nextTimeTry": ["try three examples"],
        })),
    )
    .await;
    assert_eq!(s, StatusCode::CREATED);
    let id = json["id"].as_i64().unwrap();
    assert_eq!(json["bullets"], json!(["give two examples", "keep them short"]));

    // Reads are open; no org scoping on lessons.
    let (s, _) = api(&r, "GET", &format!("/lessons/{id}"), None, None).await;
    assert_eq!(s, StatusCode::OK);

    // Mutations are not.
    let (s, _) = api(
        &r,
        "PUT",
        &format!("/lessons/{id}"),
        None,
        Some(json!({"title": "x"})),
    )
    .await;
    assert_eq!(s, StatusCode::UNAUTHORIZED);

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/lessons/{id}"),
        Some("bob-token"),
        Some(json!({"nextTimeTry": ["try three examples", "vary the order"]})),
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["nextTimeTry"].as_array().unwrap().len(), 2);

    let (s, json) = api(
        &r,
        "DELETE",
        &format!("/lessons/{id}"),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["message"], "Lesson deleted successfully");
    assert_eq!(json["lesson"]["id"], id);
}

#[tokio::test]
async fn lesson_update_with_no_recognized_fields_rejected() {
    let r = service();
    let (_, json) = api(
        &r,
        "POST",
        "/lessons",
        Some("alice-token"),
        Some(json!({"title": "L", "bullets": ["b"], "nextTimeTry": ["n"]})),
    )
    .await;
    let id = json["id"].as_i64().unwrap();

    let (s, json) = api(
        &r,
        "PUT",
        &format!("/lessons/{id}"),
        Some("alice-token"),
        Some(json!({"somethingElse": 1})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "NO_UPDATES");

    let (s, json) = api(
        &r,
        "POST",
        "/lessons",
        Some("alice-token"),
        Some(json!({"title": "L", "bullets": [], "nextTimeTry": ["n"]})),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_BULLETS");
}

// =====================================================================
// Pagination
// =====================================================================

#[tokio::test]
async fn list_pagination_defaults_and_clamp() {
    let r = service();
    for i in 0..12 {
        let (s, _) = api(
            &r,
            "POST",
            "/lessons",
            Some("alice-token"),
            Some(json!({
                "title": format!("lesson {i}"),
                "bullets": ["b"],
                "nextTimeTry": ["n"],
            })),
        )
        .await;
        assert_eq!(s, StatusCode::CREATED);
    }

    // Default limit is 10.
    let (_, json) = api(&r, "GET", "/lessons", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 10);

    // limit above the ceiling is clamped, not rejected.
    let (s, json) = api(&r, "GET", "/lessons?limit=5000", None, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 12);

    let (_, json) = api(&r, "GET", "/lessons?limit=5&offset=10", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = api(&r, "GET", "/lessons?search=lesson%203", None, None).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}
