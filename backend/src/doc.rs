//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every catalogue, course, and administration endpoint
//! plus the health probes, together with the domain schemas they reference.
//! The generated document is served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::domain::{Course, CourseInfo, Error, ErrorCode, Group, Professor, Semester, Subject, Tag};
use crate::inbound::http::courses::{CoursePayload, CourseStatusPayload};
use crate::inbound::http::groups::GroupPayload;
use crate::inbound::http::semesters::SemesterPayload;
use crate::inbound::http::subjects::SubjectPayload;
use crate::inbound::http::tags::TagPayload;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aula backend API",
        description = "HTTP interface for the academic catalogue: subjects, \
                       semesters, study groups, tags, course enrolment, and \
                       professor administration.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::subjects::list_subjects,
        crate::inbound::http::subjects::search_subjects,
        crate::inbound::http::subjects::admin_list_subjects,
        crate::inbound::http::subjects::create_subject,
        crate::inbound::http::subjects::get_subject,
        crate::inbound::http::subjects::update_subject,
        crate::inbound::http::subjects::delete_subject,
        crate::inbound::http::semesters::list_semesters,
        crate::inbound::http::semesters::search_semesters,
        crate::inbound::http::semesters::admin_list_semesters,
        crate::inbound::http::semesters::create_semester,
        crate::inbound::http::semesters::get_semester,
        crate::inbound::http::semesters::update_semester,
        crate::inbound::http::semesters::delete_semester,
        crate::inbound::http::groups::list_groups,
        crate::inbound::http::groups::search_groups,
        crate::inbound::http::groups::admin_list_groups,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::get_group,
        crate::inbound::http::groups::update_group,
        crate::inbound::http::groups::delete_group,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::search_tags,
        crate::inbound::http::tags::admin_list_tags,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::tags::update_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::add_course,
        crate::inbound::http::courses::change_course_status,
        crate::inbound::http::courses::remove_course,
        crate::inbound::http::courses::professor_subjects,
        crate::inbound::http::courses::professor_semesters,
        crate::inbound::http::courses::professor_groups,
        crate::inbound::http::professors::list_professors,
        crate::inbound::http::professors::list_applications,
        crate::inbound::http::professors::activate_application,
        crate::inbound::http::professors::reject_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Subject,
        Semester,
        Group,
        Tag,
        Professor,
        Course,
        CourseInfo,
        Error,
        ErrorCode,
        SubjectPayload,
        SemesterPayload,
        GroupPayload,
        TagPayload,
        CoursePayload,
        CourseStatusPayload,
    )),
    tags(
        (name = "subjects", description = "Subject catalogue"),
        (name = "semesters", description = "Semester catalogue"),
        (name = "groups", description = "Study-group catalogue"),
        (name = "tags", description = "Repository tags"),
        (name = "courses", description = "Course enrolment for professors"),
        (name = "professors", description = "Professor administration and applications"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;
