//! Admin handlers for professor accounts and pending applications.
//!
//! ```text
//! GET    /api/v1/admin/professors?page=
//! GET    /api/v1/admin/applications?page=
//! POST   /api/v1/admin/applications/{id}/activate
//! DELETE /api/v1/admin/applications/{id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::json;

use crate::inbound::http::envelope::ok;
use crate::inbound::http::query::PageParams;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// One admin page of approved professors.
#[utoipa::path(
    get,
    path = "/api/v1/admin/professors",
    tags = ["professors"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Active professors with pagination metadata"))
)]
#[get("/admin/professors")]
pub async fn list_professors(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.professors.list(params.page()).await?;
    Ok(ok(page))
}

/// One admin page of pending applications.
#[utoipa::path(
    get,
    path = "/api/v1/admin/applications",
    tags = ["professors"],
    params(("page" = Option<i64>, Query, description = "1-based page")),
    responses((status = 200, description = "Pending applications with pagination metadata"))
)]
#[get("/admin/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let page = state.professors.applications(params.page()).await?;
    Ok(ok(page))
}

/// Approve a pending application.
#[utoipa::path(
    post,
    path = "/api/v1/admin/applications/{id}/activate",
    tags = ["professors"],
    params(("id" = i64, Path, description = "Professor id")),
    responses(
        (status = 200, description = "Account activated"),
        (status = 404, description = "No such professor")
    )
)]
#[post("/admin/applications/{id}/activate")]
pub async fn activate_application(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.professors.activate(id).await?;
    Ok(ok(json!({ "id": id })))
}

/// Reject a pending application, deleting the account and its courses.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/applications/{id}",
    tags = ["professors"],
    params(("id" = i64, Path, description = "Professor id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 404, description = "No such professor")
    )
)]
#[delete("/admin/applications/{id}")]
pub async fn reject_application(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state.professors.reject(id).await?;
    Ok(ok(json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::state::stub::stub_state;

    #[actix_rt::test]
    async fn activation_moves_the_account_between_listings() {
        let stub = stub_state();
        let id = stub.professors.seed("Grace", false, true);
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(list_professors)
                .service(list_applications)
                .service(activate_application),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/admin/applications").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["total"], 1);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/admin/applications/{id}/activate"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/admin/professors").to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["name"], "Grace");
    }

    #[actix_rt::test]
    async fn rejecting_an_unknown_application_returns_404() {
        let stub = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(stub.state.clone())
                .service(reject_application),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/admin/applications/9")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 404);
    }
}
