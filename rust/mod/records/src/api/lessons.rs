use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use promptdeck_core::ServiceError;
use serde_json::{json, Value};

use crate::model::{CreateLesson, Lesson, LessonListQuery, LessonPatch};
use crate::validator::{
    validate_create, validate_update, FieldKind, FieldRule, ResourceSchema,
    FORBIDDEN_IDENTITY_KEYS,
};

use super::{body_object, parse_id, require_identity, typed_payload, AppState, Body, Params};

const SCHEMA: ResourceSchema = ResourceSchema {
    forbidden: FORBIDDEN_IDENTITY_KEYS,
    required: &[
        FieldRule::new("title", "Title", FieldKind::Text, "MISSING_TITLE", "MISSING_TITLE"),
        FieldRule::new(
            "bullets",
            "Bullets",
            FieldKind::StringArray,
            "INVALID_BULLETS",
            "INVALID_BULLETS",
        ),
        FieldRule::new(
            "nextTimeTry",
            "Next time try",
            FieldKind::StringArray,
            "INVALID_NEXT_TIME_TRY",
            "INVALID_NEXT_TIME_TRY",
        ),
    ],
    optional: &[],
};

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::new("title", "Title", FieldKind::Text, "INVALID_TITLE", "INVALID_TITLE"),
    FieldRule::new(
        "bullets",
        "Bullets",
        FieldKind::StringArray,
        "INVALID_BULLETS",
        "INVALID_BULLETS",
    ),
    FieldRule::new(
        "nextTimeTry",
        "Next time try",
        FieldKind::StringArray,
        "INVALID_NEXT_TIME_TRY",
        "INVALID_NEXT_TIME_TRY",
    ),
];

/// Lessons are shared content: no org scope, no owner. Reads are open;
/// mutations still require an authenticated caller.
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list).post(create))
        .route("/lessons/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Params(query): Params<LessonListQuery>,
) -> Result<Json<Vec<Lesson>>, ServiceError> {
    Ok(Json(state.store.list_lessons(&query)?))
}

async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<(StatusCode, Json<Lesson>), ServiceError> {
    require_identity(&state, &headers)?;
    validate_create(body_object(&body)?, &SCHEMA)?;
    let input: CreateLesson = typed_payload(body)?;
    let record = state.store.insert_lesson(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lesson>, ServiceError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get_lesson(id)?
        .ok_or_else(|| ServiceError::NotFound("Lesson not found".to_string()))?;
    Ok(Json(record))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Body(body): Body,
) -> Result<Json<Lesson>, ServiceError> {
    let id = parse_id(&id)?;
    require_identity(&state, &headers)?;
    let object = body_object(&body)?;
    validate_update(object, FORBIDDEN_IDENTITY_KEYS, UPDATE_RULES)?;

    let patch = LessonPatch::from_body(object);
    if patch.is_empty() {
        return Err(ServiceError::validation(
            "NO_UPDATES",
            "No valid fields provided for update",
        ));
    }

    let updated = state.store.update_lesson(id, &patch)?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ServiceError> {
    let id = parse_id(&id)?;
    require_identity(&state, &headers)?;

    let record = state
        .store
        .get_lesson(id)?
        .ok_or_else(|| ServiceError::NotFound("Lesson not found".to_string()))?;

    let affected = state.store.delete_lesson(id)?;
    if affected == 0 {
        return Err(ServiceError::NotFound("Lesson not found".to_string()));
    }

    Ok(Json(json!({
        "message": "Lesson deleted successfully",
        "lesson": record,
    })))
}
