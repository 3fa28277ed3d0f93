//! Server construction and middleware wiring.

mod config;

pub use config::{bind_addr_from_env, paging_from_env, ConfigError, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse, HttpServer};
use utoipa::OpenApi;

use crate::doc::ApiDoc;
use crate::inbound::http::courses::{
    add_course, change_course_status, list_courses, professor_groups, professor_semesters,
    professor_subjects, remove_course,
};
use crate::inbound::http::groups::{
    admin_list_groups, create_group, delete_group, get_group, list_groups, search_groups,
    update_group,
};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::professors::{
    activate_application, list_applications, list_professors, reject_application,
};
use crate::inbound::http::semesters::{
    admin_list_semesters, create_semester, delete_semester, get_semester, list_semesters,
    search_semesters, update_semester,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::subjects::{
    admin_list_subjects, create_subject, delete_subject, get_subject, list_subjects,
    search_subjects, update_subject,
};
use crate::inbound::http::tags::{
    admin_list_tags, create_tag, delete_tag, get_tag, list_tags, search_tags, update_tag,
};
use crate::middleware::RequestLog;
use crate::outbound::persistence::{
    DbPool, DieselCourseRepository, DieselGroupRepository, DieselProfessorRepository,
    DieselSemesterRepository, DieselSubjectRepository, DieselTagRepository,
};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

/// Wire the Diesel adapters over the shared pool into the handler state.
fn build_http_state(pool: &DbPool, paging: crate::domain::PagingConfig) -> web::Data<HttpState> {
    let ports = HttpStatePorts {
        subjects: Arc::new(DieselSubjectRepository::new(pool.clone())),
        semesters: Arc::new(DieselSemesterRepository::new(pool.clone())),
        groups: Arc::new(DieselGroupRepository::new(pool.clone())),
        tags: Arc::new(DieselTagRepository::new(pool.clone())),
        courses: Arc::new(DieselCourseRepository::new(pool.clone())),
        professors: Arc::new(DieselProfessorRepository::new(pool.clone())),
    };
    web::Data::new(HttpState::new(ports, paging))
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_subjects)
        .service(search_subjects)
        .service(admin_list_subjects)
        .service(create_subject)
        .service(get_subject)
        .service(update_subject)
        .service(delete_subject)
        .service(list_semesters)
        .service(search_semesters)
        .service(admin_list_semesters)
        .service(create_semester)
        .service(get_semester)
        .service(update_semester)
        .service(delete_semester)
        .service(list_groups)
        .service(search_groups)
        .service(admin_list_groups)
        .service(create_group)
        .service(get_group)
        .service(update_group)
        .service(delete_group)
        .service(list_tags)
        .service(search_tags)
        .service(admin_list_tags)
        .service(create_tag)
        .service(get_tag)
        .service(update_tag)
        .service(delete_tag)
        .service(list_courses)
        .service(add_course)
        .service(change_course_status)
        .service(remove_course)
        .service(professor_subjects)
        .service(professor_semesters)
        .service(professor_groups)
        .service(list_professors)
        .service(list_applications)
        .service(activate_application)
        .service(reject_application);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestLog)
        .service(api)
        .service(ready)
        .service(live)
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Returns the spawned [`Server`], which must be awaited to drive the
/// listener.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config.db_pool, config.paging);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
