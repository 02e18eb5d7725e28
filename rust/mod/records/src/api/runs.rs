use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use promptdeck_core::ServiceError;
use serde_json::{json, Value};

use crate::guard::{authorize, Action, OwnerMismatch, ScopePolicy};
use crate::model::{CreateRun, Run, RunListQuery, ScopeQuery, RUN_STATUSES};
use crate::validator::{
    validate_create, FieldKind, FieldRule, ResourceSchema, FORBIDDEN_IDENTITY_KEYS,
};

use super::{body_object, parse_id, require_identity, typed_payload, AppState, Body, Params};

const POLICY: ScopePolicy = ScopePolicy {
    resource: "Run",
    owner_mismatch: OwnerMismatch::Forbid,
};

const SCHEMA: ResourceSchema = ResourceSchema {
    forbidden: FORBIDDEN_IDENTITY_KEYS,
    required: &[
        FieldRule::new(
            "taskSpecId",
            "taskSpecId",
            FieldKind::Reference,
            "MISSING_TASK_SPEC_ID",
            "MISSING_TASK_SPEC_ID",
        ),
        FieldRule::new("model", "Model", FieldKind::Text, "MISSING_MODEL", "MISSING_MODEL"),
        FieldRule::new(
            "tokens",
            "Tokens",
            FieldKind::NonNegInt,
            "MISSING_TOKENS",
            "MISSING_TOKENS",
        ),
        FieldRule::new(
            "costUsd",
            "Cost",
            FieldKind::NonNegReal,
            "MISSING_COST",
            "MISSING_COST",
        ),
        FieldRule::new(
            "latencyMs",
            "Latency",
            FieldKind::NonNegInt,
            "MISSING_LATENCY",
            "MISSING_LATENCY",
        ),
        FieldRule::new("output", "Output", FieldKind::Text, "MISSING_OUTPUT", "MISSING_OUTPUT"),
    ],
    optional: &[FieldRule::new(
        "status",
        "Status",
        FieldKind::Enum(RUN_STATUSES),
        "INVALID_STATUS",
        "INVALID_STATUS",
    )],
};

/// Runs are append-only: no PUT route. A later outcome against the same
/// task spec is recorded by posting a new run.
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/runs", get(list).post(create))
        .route("/runs/{id}", get(get_one).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Params(query): Params<RunListQuery>,
) -> Result<Json<Vec<Run>>, ServiceError> {
    if let Some(ref status) = query.status {
        if !RUN_STATUSES.contains(&status.as_str()) {
            return Err(ServiceError::validation(
                "INVALID_STATUS",
                "Invalid status value",
            ));
        }
    }
    Ok(Json(state.store.list_runs(&query)?))
}

async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<(StatusCode, Json<Run>), ServiceError> {
    let identity = require_identity(&state, &headers)?;
    validate_create(body_object(&body)?, &SCHEMA)?;
    let input: CreateRun = typed_payload(body)?;

    if !state.store.task_spec_exists(input.task_spec_id)? {
        return Err(ServiceError::validation(
            "INVALID_TASK_SPEC",
            "Invalid taskSpecId",
        ));
    }

    let record = state.store.insert_run(&identity.id, input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
) -> Result<Json<Run>, ServiceError> {
    let id = parse_id(&id)?;
    let record = state.store.get_run(id)?.ok_or_else(|| POLICY.not_found())?;
    authorize(
        None,
        scope.org_id(),
        record.org_id,
        &record.user_id,
        Action::Read,
        &POLICY,
    )?;
    Ok(Json(record))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let id = parse_id(&id)?;
    let identity = require_identity(&state, &headers)?;

    let record = state.store.get_run(id)?.ok_or_else(|| POLICY.not_found())?;
    authorize(
        Some(&identity),
        scope.org_id(),
        record.org_id,
        &record.user_id,
        Action::Mutate,
        &POLICY,
    )?;

    let affected = state.store.delete_run(id, record.org_id, &identity.id)?;
    if affected == 0 {
        return Err(POLICY.not_found());
    }

    Ok(Json(json!({
        "message": "Run deleted successfully",
        "deletedRun": record,
    })))
}
