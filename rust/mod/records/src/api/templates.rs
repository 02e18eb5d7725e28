use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use promptdeck_core::ServiceError;
use serde_json::{json, Value};

use crate::guard::{authorize, Action, OwnerMismatch, ScopePolicy};
use crate::model::{CreateTemplate, ScopeQuery, Template, TemplateListQuery, TemplatePatch};
use crate::validator::{
    validate_create, validate_update, FieldKind, FieldRule, ResourceSchema,
    FORBIDDEN_IDENTITY_KEYS,
};

use super::{body_object, parse_id, require_identity, typed_payload, AppState, Body, Params};

/// A non-owner editing an org-matching template is told so outright.
const POLICY: ScopePolicy = ScopePolicy {
    resource: "Template",
    owner_mismatch: OwnerMismatch::Forbid,
};

const SCHEMA: ResourceSchema = ResourceSchema {
    forbidden: FORBIDDEN_IDENTITY_KEYS,
    required: &[
        FieldRule::new("title", "Title", FieldKind::Text, "MISSING_TITLE", "MISSING_TITLE"),
        FieldRule::new(
            "tags",
            "Tags",
            FieldKind::StringArray,
            "MISSING_TAGS",
            "MISSING_TAGS",
        ),
    ],
    optional: &[FieldRule::new(
        "taskSpecId",
        "taskSpecId",
        FieldKind::Reference,
        "INVALID_TASK_SPEC_ID",
        "INVALID_TASK_SPEC_ID",
    )],
};

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::new("title", "Title", FieldKind::Text, "INVALID_TITLE", "INVALID_TITLE"),
    FieldRule::new(
        "tags",
        "Tags",
        FieldKind::StringArray,
        "INVALID_TAGS",
        "INVALID_TAGS",
    ),
    FieldRule::new(
        "taskSpecId",
        "taskSpecId",
        FieldKind::Reference,
        "INVALID_TASK_SPEC",
        "INVALID_TASK_SPEC",
    ),
];

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list).post(create))
        .route("/templates/{id}", get(get_one).put(update).delete(remove))
}

/// The referenced task spec must exist at write time. The reference is
/// weak after that; deleting the spec leaves the template dangling.
/// Create and update report the failure under different wire codes, a
/// wrinkle existing clients depend on.
fn check_reference(
    state: &AppState,
    task_spec_id: i64,
    code: &'static str,
    message: &str,
) -> Result<(), ServiceError> {
    if state.store.task_spec_exists(task_spec_id)? {
        Ok(())
    } else {
        Err(ServiceError::validation(code, message))
    }
}

async fn list(
    State(state): State<AppState>,
    Params(query): Params<TemplateListQuery>,
) -> Result<Json<Vec<Template>>, ServiceError> {
    Ok(Json(state.store.list_templates(&query)?))
}

async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<(StatusCode, Json<Template>), ServiceError> {
    let identity = require_identity(&state, &headers)?;
    validate_create(body_object(&body)?, &SCHEMA)?;
    let input: CreateTemplate = typed_payload(body)?;

    if let Some(ref_id) = input.task_spec_id {
        check_reference(&state, ref_id, "INVALID_TASK_SPEC_ID", "Invalid taskSpecId")?;
    }

    let record = state.store.insert_template(&identity.id, input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(scope): Params<ScopeQuery>,
) -> Result<Json<Template>, ServiceError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get_template(id)?
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
) -> Result<Json<Template>, ServiceError> {
    let id = parse_id(&id)?;
    let identity = require_identity(&state, &headers)?;
    let object = body_object(&body)?;
    validate_update(object, FORBIDDEN_IDENTITY_KEYS, UPDATE_RULES)?;
    let patch = TemplatePatch::from_body(object);

    if let Some(Some(ref_id)) = patch.task_spec_id {
        check_reference(&state, ref_id, "INVALID_TASK_SPEC", "Task spec not found")?;
    }

    let record = state
        .store
        .get_template(id)?
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
        .update_template(id, record.org_id, &identity.id, &patch)?;
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
        .get_template(id)?
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
        .delete_template(id, record.org_id, &identity.id)?;
    if affected == 0 {
        return Err(POLICY.not_found());
    }

    Ok(Json(json!({
        "success": true,
        "message": "Template deleted successfully",
        "deleted": record,
    })))
}
