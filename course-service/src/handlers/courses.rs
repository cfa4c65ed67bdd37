use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{
    CourseContentResponse, CourseListResponse, CourseMutationResponse, CourseQuery,
    CourseQueryResponse, CreateCourseRequest, DeleteCourseResponse, UpdateCourseRequest,
};
use crate::services::CourseError;
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseMutationResponse>), AppError> {
    let Json(request) = payload?;
    let (course_id, brief) = request.into_parts()?;

    let content = state.courses.create(&course_id, &brief).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseMutationResponse {
            message: "Course added successfully.".to_string(),
            course_id,
            content,
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<CourseQueryResponse>, AppError> {
    let response = match query.id() {
        Some(course_id) => CourseQueryResponse::One(CourseContentResponse {
            content: state.courses.get(course_id)?,
            course_id: course_id.to_string(),
        }),
        None => CourseQueryResponse::All(CourseListResponse {
            courses: state.courses.list(),
        }),
    };
    Ok(Json(response))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    payload: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<CourseMutationResponse>, AppError> {
    // Unknown ids are reported before the body is looked at.
    if !state.courses.exists(&course_id) {
        return Err(CourseError::NotFound.into());
    }
    let Json(request) = payload?;
    let brief = request.into_brief()?;

    let content = state.courses.update(&course_id, &brief).await?;

    Ok(Json(CourseMutationResponse {
        message: "Course updated successfully.".to_string(),
        course_id,
        content,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<DeleteCourseResponse>, AppError> {
    state.courses.delete(&course_id).await?;

    Ok(Json(DeleteCourseResponse {
        message: "Course deleted successfully.".to_string(),
        course_id,
    }))
}
