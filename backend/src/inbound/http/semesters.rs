//! Semester HTTP handlers; same surface as subjects.

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::Page;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SearchOrder;
use crate::domain::Semester;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::query::{parse_order, PageParams, SearchParams};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or renaming a semester.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SemesterPayload {
    /// The semester name.
    pub name: String,
}

fn sort_by_order(items: &mut [Semester], order: SearchOrder) {
    match order {
        SearchOrder::IdAsc => items.sort_by_key(|s| s.id),
        SearchOrder::NameAsc => items.sort_by(|a, b| a.name.cmp(&b.name)),
        SearchOrder::NameDesc => items.sort_by(|a, b| b.name.cmp(&a.name)),
    }
}

/// Every semester, name ascending.
#[utoipa::path(
    get,
    path = "/api/v1/semesters",
    tags = ["semesters"],
    responses((status = 200, description = "All semesters", body = [Semester]))
)]
#[get("/semesters")]
pub async fn list_semesters(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let semesters = state.semesters.list_all().await?;
    Ok(ok(semesters))
}

/// Keyword search over semesters, with the short-keyword fallback.
#[utoipa::path(
    get,
    path = "/api/v1/semesters/search",
    tags = ["semesters"],
    params(
        ("q" = Option<String>, Query, description = "Keyword"),
        ("order" = Option<String>, Query, description = "id_asc, name_asc, or name_desc"),
        ("page" = Option<i64>, Query, description = "1-based page"),
        ("limit" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching semesters with pagination metadata"),
        (status = 400, description = "Unknown order token")
    )
)]
#[get("/semesters/search")]
pub async fn search_semesters(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let order = parse_order(params.order.as_deref())?;
    let keyword = params.keyword().trim();
    if keyword.chars().count() < 2 {
        let mut items = state.semesters.list_all().await?;
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
        .semesters
        .search(keyword, order, params.page(), params.limit())
        .await?;
    Ok(ok(page))
}

/// One admin page of semesters with the total count.
#[utoipa::path(
    get,
    path = "/api/v1/admin/semesters",
    tags = ["semesters"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Semesters with pagination metadata"))
)]
#[get("/admin/semesters")]
pub async fn admin_list_semesters(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.semesters.list(params.page()).await?;
    Ok(ok(page))
}

/// Create a semester.
#[utoipa::path(
    post,
    path = "/api/v1/admin/semesters",
    tags = ["semesters"],
    request_body = SemesterPayload,
    responses(
        (status = 201, description = "Semester created", body = Semester),
        (status = 400, description = "Name fails validation"),
        (status = 409, description = "Name already in use")
    )
)]
#[post("/admin/semesters")]
pub async fn create_semester(
    state: web::Data<HttpState>,
    payload: web::Json<SemesterPayload>,
) -> ApiResult<HttpResponse> {
    let semester = state.semesters.create(&payload.name).await?;
    Ok(created(semester))
}

/// Fetch a single semester.
#[utoipa::path(
    get,
    path = "/api/v1/admin/semesters/{id}",
    tags = ["semesters"],
    params(("id" = i64, Path, description = "Semester id")),
    responses(
        (status = 200, description = "The semester", body = Semester),
        (status = 404, description = "No such semester")
    )
)]
#[get("/admin/semesters/{id}")]
pub async fn get_semester(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let semester = state.semesters.get(path.into_inner()).await?;
    Ok(ok(semester))
}

/// Rename a semester.
#[utoipa::path(
    put,
    path = "/api/v1/admin/semesters/{id}",
    tags = ["semesters"],
    params(("id" = i64, Path, description = "Semester id")),
    request_body = SemesterPayload,
    responses(
        (status = 200, description = "Semester updated", body = Semester),
        (status = 404, description = "No such semester"),
        (status = 409, description = "Name already in use")
    )
)]
#[put("/admin/semesters/{id}")]
pub async fn update_semester(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<SemesterPayload>,
) -> ApiResult<HttpResponse> {
    let semester = state
        .semesters
        .update(path.into_inner(), &payload.name)
        .await?;
    Ok(ok(semester))
}

/// Delete a semester and its course enrolments.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/semesters/{id}",
    tags = ["semesters"],
    params(("id" = i64, Path, description = "Semester id")),
    responses(
        (status = 200, description = "Semester deleted"),
        (status = 404, description = "No such semester")
    )
)]
#[delete("/admin/semesters/{id}")]
pub async fn delete_semester(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.semesters.delete(id).await?;
    Ok(ok(json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::state::stub::stub_state;

    #[actix_rt::test]
    async fn create_then_list_round_trips() {
        let stub = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(create_semester)
                .service(list_semesters),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/semesters")
                .set_json(serde_json::json!({ "name": "2026-1" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/semesters").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["name"], "2026-1");
    }

    #[actix_rt::test]
    async fn update_of_missing_semester_returns_404() {
        let stub = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(update_semester),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/admin/semesters/7")
                .set_json(serde_json::json!({ "name": "2026-2" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 404);
    }
}
