use std::sync::Arc;

use axum::{extract::Query, http::Uri, response::Response, Extension};
use http_problem::ProblemResponse;
use tracing::info;

use super::paged;
use crate::api::rest::dto::{GroceryItemDto, PageParams, RestDto};
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::RestContext;
use crate::domain::service::{GroceryItemService, ServiceConfig, UserService};

/// `GET /api/grocery-items/mine`
pub async fn my_grocery_items(
    Extension(items): Extension<Arc<GroceryItemService>>,
    Extension(users): Extension<Arc<UserService>>,
    Extension(paging): Extension<ServiceConfig>,
    Extension(ctx): Extension<RestContext>,
    CurrentUser(login): CurrentUser,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to get GroceryItems of the current user");

    let user = users
        .sync_user(&login)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    let req = paging.page_request(params.page, params.size);
    let page = items
        .find_mine(&user.login, req)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(paged(&uri, page, GroceryItemDto::from_model))
}
