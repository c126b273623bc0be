use crate::{
    data::student::{AddStudentRequestDto, StudentDto},
    error::RollcallResult,
    routes::json::{JsonBody, PathParam, ValidatedJson},
    state::RollcallState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Map, Value};

pub async fn get_all_students(
    State(state): State<RollcallState>,
) -> RollcallResult<Json<Vec<StudentDto>>> {
    state.students().get_all_students().await.map(Json)
}

pub async fn get_student_by_id(
    State(state): State<RollcallState>,
    PathParam(id): PathParam<i64>,
) -> RollcallResult<Json<StudentDto>> {
    state.students().get_student_by_id(id).await.map(Json)
}

pub async fn create_new_student(
    State(state): State<RollcallState>,
    ValidatedJson(request): ValidatedJson<AddStudentRequestDto>,
) -> RollcallResult<(StatusCode, Json<StudentDto>)> {
    let created = state.students().create_new_student(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_student(
    State(state): State<RollcallState>,
    PathParam(id): PathParam<i64>,
) -> RollcallResult<StatusCode> {
    state.students().delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_student(
    State(state): State<RollcallState>,
    PathParam(id): PathParam<i64>,
    ValidatedJson(request): ValidatedJson<AddStudentRequestDto>,
) -> RollcallResult<Json<StudentDto>> {
    state.students().update_student(id, request).await.map(Json)
}

pub async fn update_partial_student(
    State(state): State<RollcallState>,
    PathParam(id): PathParam<i64>,
    JsonBody(updates): JsonBody<Map<String, Value>>,
) -> RollcallResult<Json<StudentDto>> {
    state
        .students()
        .update_partial_student(id, updates)
        .await
        .map(Json)
}
