use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use promptdeck_core::ServiceError;
use serde_json::{json, Value};

use crate::guard::{authorize, Action, OwnerMismatch, ScopePolicy};
use crate::model::{
    CreateTaskSpec, ScopeQuery, TaskSpec, TaskSpecListQuery, TaskSpecPatch, FAMILIES,
};
use crate::validator::{
    validate_create, validate_update, FieldKind, FieldRule, ResourceSchema,
    FORBIDDEN_IDENTITY_KEYS,
};

use super::{body_object, parse_id, require_identity, typed_payload, AppState, Body, Params};

/// Task specs conceal ownership: a non-owner probing an org-matching
/// record sees the same 404 as a nonexistent id.
const POLICY: ScopePolicy = ScopePolicy {
    resource: "Task spec",
    owner_mismatch: OwnerMismatch::Conceal,
};

const SCHEMA: ResourceSchema = ResourceSchema {
    forbidden: FORBIDDEN_IDENTITY_KEYS,
    required: &[
        FieldRule::new(
            "goal",
            "Goal",
            FieldKind::Text,
            "MISSING_REQUIRED_FIELD",
            "MISSING_REQUIRED_FIELD",
        ),
        FieldRule::new(
            "inputs",
            "Inputs",
            FieldKind::Structured,
            "MISSING_REQUIRED_FIELD",
            "MISSING_REQUIRED_FIELD",
        ),
        FieldRule::new(
            "constraints",
            "Constraints",
            FieldKind::Structured,
            "MISSING_REQUIRED_FIELD",
            "MISSING_REQUIRED_FIELD",
        ),
        FieldRule::new(
            "acceptanceCriteria",
            "Acceptance criteria",
            FieldKind::Structured,
            "MISSING_REQUIRED_FIELD",
            "MISSING_REQUIRED_FIELD",
        ),
        FieldRule::new(
            "family",
            "Family",
            FieldKind::Enum(FAMILIES),
            "MISSING_REQUIRED_FIELD",
            "INVALID_FAMILY",
        ),
    ],
    optional: &[],
};

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::new(
        "family",
        "Family",
        FieldKind::Enum(FAMILIES),
        "MISSING_REQUIRED_FIELD",
        "INVALID_FAMILY",
    ),
    FieldRule::new(
        "goal",
        "Goal",
        FieldKind::Text,
        "MISSING_REQUIRED_FIELD",
        "MISSING_REQUIRED_FIELD",
    ),
];

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/task-specs", get(list).post(create))
        .route(
            "/task-specs/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    Params(query): Params<TaskSpecListQuery>,
) -> Result<Json<Vec<TaskSpec>>, ServiceError> {
    Ok(Json(state.store.list_task_specs(&query)?))
}

async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<(StatusCode, Json<TaskSpec>), ServiceError> {
    let identity = require_identity(&state, &headers)?;
    validate_create(body_object(&body)?, &SCHEMA)?;
    let input: CreateTaskSpec = typed_payload(body)?;
    let record = state.store.insert_task_spec(&identity.id, input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
) -> Result<Json<TaskSpec>, ServiceError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get_task_spec(id)?
        .ok_or_else(|| POLICY.not_found())?;
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

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<Json<TaskSpec>, ServiceError> {
    let id = parse_id(&id)?;
    let identity = require_identity(&state, &headers)?;
    let object = body_object(&body)?;
    validate_update(object, FORBIDDEN_IDENTITY_KEYS, UPDATE_RULES)?;
    let patch = TaskSpecPatch::from_body(object);

    let record = state
        .store
        .get_task_spec(id)?
        .ok_or_else(|| POLICY.not_found())?;
    authorize(
        Some(&identity),
        scope.org_id(),
        record.org_id,
        &record.user_id,
        Action::Mutate,
        &POLICY,
    )?;

    let updated = state
        .store
        .update_task_spec(id, record.org_id, &identity.id, &patch)?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let id = parse_id(&id)?;
    let identity = require_identity(&state, &headers)?;

    let record = state
        .store
        .get_task_spec(id)?
        .ok_or_else(|| POLICY.not_found())?;
    authorize(
        Some(&identity),
        scope.org_id(),
        record.org_id,
        &record.user_id,
        Action::Mutate,
        &POLICY,
    )?;

    let affected = state
        .store
        .delete_task_spec(id, record.org_id, &identity.id)?;
    if affected == 0 {
        return Err(POLICY.not_found());
    }

    Ok(Json(json!({
        "message": "Task spec deleted successfully",
        "record": record,
    })))
}
