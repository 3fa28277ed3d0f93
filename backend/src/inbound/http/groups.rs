//! Study-group HTTP handlers; same surface as subjects.

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::Page;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SearchOrder;
use crate::domain::Group;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::query::{parse_order, PageParams, SearchParams};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or renaming a group.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GroupPayload {
    /// The group name.
    pub name: String,
}

fn sort_by_order(items: &mut [Group], order: SearchOrder) {
    match order {
        SearchOrder::IdAsc => items.sort_by_key(|g| g.id),
        SearchOrder::NameAsc => items.sort_by(|a, b| a.name.cmp(&b.name)),
        SearchOrder::NameDesc => items.sort_by(|a, b| b.name.cmp(&a.name)),
    }
}

/// Every group, name ascending.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tags = ["groups"],
    responses((status = 200, description = "All groups", body = [Group]))
)]
#[get("/groups")]
pub async fn list_groups(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let groups = state.groups.list_all().await?;
    Ok(ok(groups))
}

/// Keyword search over groups, with the short-keyword fallback.
#[utoipa::path(
    get,
    path = "/api/v1/groups/search",
    tags = ["groups"],
    params(
        ("q" = Option<String>, Query, description = "Keyword"),
        ("order" = Option<String>, Query, description = "id_asc, name_asc, or name_desc"),
        ("page" = Option<i64>, Query, description = "1-based page"),
        ("limit" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching groups with pagination metadata"),
        (status = 400, description = "Unknown order token")
    )
)]
#[get("/groups/search")]
pub async fn search_groups(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let order = parse_order(params.order.as_deref())?;
    let keyword = params.keyword().trim();
    if keyword.chars().count() < 2 {
        let mut items = state.groups.list_all().await?;
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
        .groups
        .search(keyword, order, params.page(), params.limit())
        .await?;
    Ok(ok(page))
}

/// One admin page of groups with the total count.
#[utoipa::path(
    get,
    path = "/api/v1/admin/groups",
    tags = ["groups"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Groups with pagination metadata"))
)]
#[get("/admin/groups")]
pub async fn admin_list_groups(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.groups.list(params.page()).await?;
    Ok(ok(page))
}

/// Create a group.
#[utoipa::path(
    post,
    path = "/api/v1/admin/groups",
    tags = ["groups"],
    request_body = GroupPayload,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Name fails validation"),
        (status = 409, description = "Name already in use")
    )
)]
#[post("/admin/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    payload: web::Json<GroupPayload>,
) -> ApiResult<HttpResponse> {
    let group = state.groups.create(&payload.name).await?;
    Ok(created(group))
}

/// Fetch a single group.
#[utoipa::path(
    get,
    path = "/api/v1/admin/groups/{id}",
    tags = ["groups"],
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "The group", body = Group),
        (status = 404, description = "No such group")
    )
)]
#[get("/admin/groups/{id}")]
pub async fn get_group(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let group = state.groups.get(path.into_inner()).await?;
    Ok(ok(group))
}

/// Rename a group.
#[utoipa::path(
    put,
    path = "/api/v1/admin/groups/{id}",
    tags = ["groups"],
    params(("id" = i64, Path, description = "Group id")),
    request_body = GroupPayload,
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 404, description = "No such group"),
        (status = 409, description = "Name already in use")
    )
)]
#[put("/admin/groups/{id}")]
pub async fn update_group(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<GroupPayload>,
) -> ApiResult<HttpResponse> {
    let group = state.groups.update(path.into_inner(), &payload.name).await?;
    Ok(ok(group))
}

/// Delete a group and its course enrolments.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/groups/{id}",
    tags = ["groups"],
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 404, description = "No such group")
    )
)]
#[delete("/admin/groups/{id}")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.groups.delete(id).await?;
    Ok(ok(json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::state::stub::stub_state;

    #[actix_rt::test]
    async fn admin_listing_carries_pagination_metadata() {
        let stub = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(create_group)
                .service(admin_list_groups),
        )
        .await;

        for name in ["Group A", "Group B"] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/admin/groups")
                    .set_json(serde_json::json!({ "name": name }))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), 201);
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/admin/groups").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["page_size"], 50);
    }

    #[actix_rt::test]
    async fn blank_name_returns_400() {
        let stub = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(create_group),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/groups")
                .set_json(serde_json::json!({ "name": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }
}
