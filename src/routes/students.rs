use crate::{data::Student, error::StudentsResult, state::StudentState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

pub async fn post_student(
    State(state): State<StudentState>,
    Json(student): Json<Student>,
) -> StudentsResult<Json<Student>> {
    Ok(Json(state.add_student(student).await?))
}

pub async fn put_student(
    State(state): State<StudentState>,
    Path(id): Path<String>,
    Json(mut student): Json<Student>,
) -> StudentsResult<Json<Student>> {
    student.id = Some(id);
    Ok(Json(state.update_student(student).await?))
}

pub async fn get_students(State(state): State<StudentState>) -> StudentsResult<Json<Vec<Student>>> {
    Ok(Json(state.get_all_students().await?))
}

//no not-found signal, deleting something that was never there is still a success
pub async fn delete_student(
    State(state): State<StudentState>,
    Path(id): Path<String>,
) -> StudentsResult<StatusCode> {
    state.delete_student(&id).await?;
    Ok(StatusCode::OK)
}
