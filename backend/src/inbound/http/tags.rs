//! Tag HTTP handlers; tags use `label` where the catalogue entities use
//! `name`, and professors have no tag listings.

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::Page;
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SearchOrder;
use crate::domain::Tag;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::query::{parse_order, PageParams, SearchParams};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or relabelling a tag.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TagPayload {
    /// The tag label.
    pub label: String,
}

fn sort_by_order(items: &mut [Tag], order: SearchOrder) {
    match order {
        SearchOrder::IdAsc => items.sort_by_key(|t| t.id),
        SearchOrder::NameAsc => items.sort_by(|a, b| a.label.cmp(&b.label)),
        SearchOrder::NameDesc => items.sort_by(|a, b| b.label.cmp(&a.label)),
    }
}

/// Every tag, label ascending.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tags = ["tags"],
    responses((status = 200, description = "All tags", body = [Tag]))
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tags = state.tags.list_all().await?;
    Ok(ok(tags))
}

/// Keyword search over tags, with the short-keyword fallback.
#[utoipa::path(
    get,
    path = "/api/v1/tags/search",
    tags = ["tags"],
    params(
        ("q" = Option<String>, Query, description = "Keyword"),
        ("order" = Option<String>, Query, description = "id_asc, name_asc, or name_desc"),
        ("page" = Option<i64>, Query, description = "1-based page"),
        ("limit" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Matching tags with pagination metadata"),
        (status = 400, description = "Unknown order token")
    )
)]
#[get("/tags/search")]
pub async fn search_tags(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let order = parse_order(params.order.as_deref())?;
    let keyword = params.keyword().trim();
    if keyword.chars().count() < 2 {
        let mut items = state.tags.list_all().await?;
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
        .tags
        .search(keyword, order, params.page(), params.limit())
        .await?;
    Ok(ok(page))
}

/// One admin page of tags with the total count.
#[utoipa::path(
    get,
    path = "/api/v1/admin/tags",
    tags = ["tags"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Tags with pagination metadata"))
)]
#[get("/admin/tags")]
pub async fn admin_list_tags(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.tags.list(params.page()).await?;
    Ok(ok(page))
}

/// Create a tag.
#[utoipa::path(
    post,
    path = "/api/v1/admin/tags",
    tags = ["tags"],
    request_body = TagPayload,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Label fails validation"),
        (status = 409, description = "Label already in use")
    )
)]
#[post("/admin/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    payload: web::Json<TagPayload>,
) -> ApiResult<HttpResponse> {
    let tag = state.tags.create(&payload.label).await?;
    Ok(created(tag))
}

/// Fetch a single tag.
#[utoipa::path(
    get,
    path = "/api/v1/admin/tags/{id}",
    tags = ["tags"],
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "The tag", body = Tag),
        (status = 404, description = "No such tag")
    )
)]
#[get("/admin/tags/{id}")]
pub async fn get_tag(state: web::Data<HttpState>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let tag = state.tags.get(path.into_inner()).await?;
    Ok(ok(tag))
}

/// Relabel a tag.
#[utoipa::path(
    put,
    path = "/api/v1/admin/tags/{id}",
    tags = ["tags"],
    params(("id" = i64, Path, description = "Tag id")),
    request_body = TagPayload,
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 404, description = "No such tag"),
        (status = 409, description = "Label already in use")
    )
)]
#[put("/admin/tags/{id}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<TagPayload>,
) -> ApiResult<HttpResponse> {
    let tag = state.tags.update(path.into_inner(), &payload.label).await?;
    Ok(ok(tag))
}

/// Delete a tag and its repository links.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/tags/{id}",
    tags = ["tags"],
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 404, description = "No such tag")
    )
)]
#[delete("/admin/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.tags.delete(id).await?;
    Ok(ok(json!({ "id": id })))
}
