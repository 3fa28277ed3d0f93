//! Professor settings handlers: course enrolments and the filtered
//! catalogue listings backing the enrolment form.
//!
//! ```text
//! GET    /api/v1/professors/{id}/courses
//! POST   /api/v1/professors/{id}/courses {"subject":"Math","semester":"2026-1","group":"A","active":true}
//! PUT    /api/v1/professors/{id}/courses/status {"subject":"Math","active":false}
//! DELETE /api/v1/professors/{id}/courses/{course_id}
//! GET    /api/v1/professors/{id}/subjects | /semesters | /groups
//! ```
//!
//! Course payloads carry entity names, not ids: the enrolment form offers
//! the catalogue by name and the handlers resolve them before touching the
//! course service.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{NewCourse, SubjectError};
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for enrolling a professor on a course.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CoursePayload {
    /// Subject name.
    pub subject: String,
    /// Semester name.
    pub semester: String,
    /// Group name.
    pub group: String,
    /// Initial active flag; defaults to true.
    pub active: Option<bool>,
}

/// Request payload for flipping a course's active flag.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseStatusPayload {
    /// Subject name identifying the course.
    pub subject: String,
    /// The new active flag.
    pub active: bool,
}

/// The professor's courses with their referenced catalogue entities.
#[utoipa::path(
    get,
    path = "/api/v1/professors/{id}/courses",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    responses(
        (status = 200, description = "Assembled course list"),
        (status = 404, description = "No such professor")
    )
)]
#[get("/professors/{id}/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let infos = state.courses.courses_info(path.into_inner()).await?;
    Ok(ok(infos))
}

/// Enrol the professor on a course named by its catalogue entities.
#[utoipa::path(
    post,
    path = "/api/v1/professors/{id}/courses",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    request_body = CoursePayload,
    responses(
        (status = 201, description = "Course created"),
        (status = 404, description = "Professor or a named entity does not exist"),
        (status = 409, description = "The tuple is already enrolled")
    )
)]
#[post("/professors/{id}/courses")]
pub async fn add_course(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<CoursePayload>,
) -> ApiResult<HttpResponse> {
    let professor_id = path.into_inner();
    let subject = state.subjects.get_by_name(&payload.subject).await?;
    let semester = state.semesters.get_by_name(&payload.semester).await?;
    let group = state.groups.get_by_name(&payload.group).await?;
    let course = state
        .courses
        .add(NewCourse {
            professor_id,
            subject_id: subject.id,
            semester_id: semester.id,
            group_id: group.id,
            is_active: payload.active.unwrap_or(true),
        })
        .await?;
    Ok(created(course))
}

/// Flip the active flag of the professor's course for a subject.
///
/// Always 200: an unknown subject name or a professor with no course for
/// it is a successful no-op, so the settings form can submit blindly.
#[utoipa::path(
    put,
    path = "/api/v1/professors/{id}/courses/status",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    request_body = CourseStatusPayload,
    responses((status = 200, description = "Flag updated or nothing to update"))
)]
#[put("/professors/{id}/courses/status")]
pub async fn change_course_status(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<CourseStatusPayload>,
) -> ApiResult<HttpResponse> {
    let professor_id = path.into_inner();
    let subject = match state.subjects.get_by_name(&payload.subject).await {
        Ok(subject) => subject,
        Err(SubjectError::NotFound { .. }) => return Ok(ok(json!({ "updated": false }))),
        Err(e) => return Err(e.into()),
    };
    state
        .courses
        .change_status(professor_id, subject.id, payload.active)
        .await?;
    Ok(ok(json!({ "updated": true })))
}

/// Remove a course enrolment; idempotent.
#[utoipa::path(
    delete,
    path = "/api/v1/professors/{id}/courses/{course_id}",
    tags = ["courses"],
    params(
        ("id" = i64, Path, description = "Professor id"),
        ("course_id" = i64, Path, description = "Course id")
    ),
    responses((status = 200, description = "Course removed or already gone"))
)]
#[delete("/professors/{id}/courses/{course_id}")]
pub async fn remove_course(
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (professor_id, course_id) = path.into_inner();
    state.courses.remove(professor_id, course_id).await?;
    Ok(ok(json!({ "id": course_id })))
}

/// Distinct subjects the professor teaches.
#[utoipa::path(
    get,
    path = "/api/v1/professors/{id}/subjects",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    responses((status = 200, description = "Subjects joined through the professor's courses"))
)]
#[get("/professors/{id}/subjects")]
pub async fn professor_subjects(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let subjects = state.subjects.list_for_professor(path.into_inner()).await?;
    Ok(ok(subjects))
}

/// Distinct semesters in which the professor teaches.
#[utoipa::path(
    get,
    path = "/api/v1/professors/{id}/semesters",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    responses((status = 200, description = "Semesters joined through the professor's courses"))
)]
#[get("/professors/{id}/semesters")]
pub async fn professor_semesters(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let semesters = state
        .semesters
        .list_for_professor(path.into_inner())
        .await?;
    Ok(ok(semesters))
}

/// Distinct groups the professor teaches.
#[utoipa::path(
    get,
    path = "/api/v1/professors/{id}/groups",
    tags = ["courses"],
    params(("id" = i64, Path, description = "Professor id")),
    responses((status = 200, description = "Groups joined through the professor's courses"))
)]
#[get("/professors/{id}/groups")]
pub async fn professor_groups(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let groups = state.groups.list_for_professor(path.into_inner()).await?;
    Ok(ok(groups))
}
