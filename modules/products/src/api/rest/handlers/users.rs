use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::Uri,
    response::Response,
    Extension, Json,
};
use http_problem::ProblemResponse;
use tracing::info;

use super::paged;
use crate::api::rest::dto::{PageParams, UserDto};
use crate::api::rest::RestContext;
use crate::domain::service::{ServiceConfig, UserService};

/// `GET /api/admin/users`
pub async fn list_users(
    Extension(users): Extension<Arc<UserService>>,
    Extension(paging): Extension<ServiceConfig>,
    Extension(ctx): Extension<RestContext>,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to get all Users");

    let req = paging.page_request(params.page, params.size);
    let page = users
        .find_all(req)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(paged(&uri, page, UserDto::from))
}

/// `GET /api/admin/users/{login}`
pub async fn get_user(
    Extension(users): Extension<Arc<UserService>>,
    Extension(ctx): Extension<RestContext>,
    Path(login): Path<String>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("REST request to get User {}", login);

    users
        .find_by_login(&login)
        .await
        .map(|u| Json(UserDto::from(u)))
        .map_err(|e| ctx.problem(&e, uri.path()))
}
