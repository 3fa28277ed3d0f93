//! Subject HTTP handlers.
//!
//! ```text
//! GET    /api/v1/subjects
//! GET    /api/v1/subjects/search?q=&order=&page=&limit=
//! GET    /api/v1/admin/subjects?page=
//! POST   /api/v1/admin/subjects {"name":"Algebra"}
//! GET    /api/v1/admin/subjects/{id}
//! PUT    /api/v1/admin/subjects/{id}
//! DELETE /api/v1/admin/subjects/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::Page;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SearchOrder;
use crate::domain::Subject;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::query::{parse_order, PageParams, SearchParams};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or renaming a subject.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SubjectPayload {
    /// The subject name.
    pub name: String,
}

fn sort_by_order(items: &mut [Subject], order: SearchOrder) {
    match order {
        SearchOrder::IdAsc => items.sort_by_key(|s| s.id),
        SearchOrder::NameAsc => items.sort_by(|a, b| a.name.cmp(&b.name)),
        SearchOrder::NameDesc => items.sort_by(|a, b| b.name.cmp(&a.name)),
    }
}

/// Every subject, name ascending.
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    tags = ["subjects"],
    responses(
        (status = 200, description = "All subjects", body = [Subject]),
        (status = 503, description = "Database unavailable")
    )
)]
#[get("/subjects")]
pub async fn list_subjects(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let subjects = state.subjects.list_all().await?;
    Ok(ok(subjects))
}

/// Keyword search over subjects.
///
/// Keywords shorter than two characters fall back to the full list so the
/// explore page never comes up empty while typing.
#[utoipa::path(
    get,
    path = "/api/v1/subjects/search",
    tags = ["subjects"],
    params(
        ("q" = Option<String>, Query, description = "Keyword"),
        ("order" = Option<String>, Query, description = "id_asc, name_asc, or name_desc"),
        ("page" = Option<i64>, Query, description = "1-based page"),
        ("limit" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching subjects with pagination metadata"),
        (status = 400, description = "Unknown order token")
    )
)]
#[get("/subjects/search")]
pub async fn search_subjects(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let order = parse_order(params.order.as_deref())?;
    let keyword = params.keyword().trim();
    if keyword.chars().count() < 2 {
        let mut items = state.subjects.list_all().await?;
        sort_by_order(&mut items, order);
        let total = items.len() as i64;
        return Ok(ok(Page {
            items,
            total,
            page: 1,
            page_size: total.max(1),
        }));
    }
    let page = state
        .subjects
        .search(keyword, order, params.page(), params.limit())
        .await?;
    Ok(ok(page))
}

/// One admin page of subjects with the total count.
#[utoipa::path(
    get,
    path = "/api/v1/admin/subjects",
    tags = ["subjects"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Subjects with pagination metadata"))
)]
#[get("/admin/subjects")]
pub async fn admin_list_subjects(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.subjects.list(params.page()).await?;
    Ok(ok(page))
}

/// Create a subject.
#[utoipa::path(
    post,
    path = "/api/v1/admin/subjects",
    tags = ["subjects"],
    request_body = SubjectPayload,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Name fails validation"),
        (status = 409, description = "Name already in use")
    )
)]
#[post("/admin/subjects")]
pub async fn create_subject(
    state: web::Data<HttpState>,
    payload: web::Json<SubjectPayload>,
) -> ApiResult<HttpResponse> {
    let subject = state.subjects.create(&payload.name).await?;
    Ok(created(subject))
}

/// Fetch a single subject.
#[utoipa::path(
    get,
    path = "/api/v1/admin/subjects/{id}",
    tags = ["subjects"],
    params(("id" = i64, Path, description = "Subject id")),
    responses(
        (status = 200, description = "The subject", body = Subject),
        (status = 404, description = "No such subject")
    )
)]
#[get("/admin/subjects/{id}")]
pub async fn get_subject(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let subject = state.subjects.get(path.into_inner()).await?;
    Ok(ok(subject))
}

/// Rename a subject.
#[utoipa::path(
    put,
    path = "/api/v1/admin/subjects/{id}",
    tags = ["subjects"],
    params(("id" = i64, Path, description = "Subject id")),
    request_body = SubjectPayload,
    responses(
        (status = 200, description = "Subject updated", body = Subject),
        (status = 400, description = "Name fails validation"),
        (status = 404, description = "No such subject"),
        (status = 409, description = "Name already in use")
    )
)]
#[put("/admin/subjects/{id}")]
pub async fn update_subject(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<SubjectPayload>,
) -> ApiResult<HttpResponse> {
    let subject = state.subjects.update(path.into_inner(), &payload.name).await?;
    Ok(ok(subject))
}

/// Delete a subject and its course enrolments.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/subjects/{id}",
    tags = ["subjects"],
    params(("id" = i64, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Subject deleted"),
        (status = 404, description = "No such subject")
    )
)]
#[delete("/admin/subjects/{id}")]
pub async fn delete_subject(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.subjects.delete(id).await?;
    Ok(ok(json!({ "id": id })))
}
