use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use http_problem::ProblemResponse;
use tracing::{error, info};

use super::paged;
use crate::api::rest::dto::{PageParams, RecipeDto, RecipeIngredientDto, RestDto};
use crate::api::rest::extract::CurrentUser;
use crate::api::rest::RestContext;
use crate::contract::model::EntityKind;
use crate::domain::service::{RecipeService, ServiceConfig, UserService};

/// `GET /api/recipes/mine`
pub async fn my_recipes(
    Extension(recipes): Extension<Arc<RecipeService>>,
    Extension(users): Extension<Arc<UserService>>,
    Extension(paging): Extension<ServiceConfig>,
    Extension(ctx): Extension<RestContext>,
    CurrentUser(login): CurrentUser,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to get Recipes of the current user");

    let user = users
        .sync_user(&login)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    let req = paging.page_request(params.page, params.size);
    let page = recipes
        .find_mine(&user.login, req)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(paged(&uri, page, RecipeDto::from_model))
}

/// `GET /api/recipes/{id}/recipe-ingredients`
pub async fn ingredients_of(
    Extension(recipes): Extension<Arc<RecipeService>>,
    Extension(ctx): Extension<RestContext>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<Vec<RecipeIngredientDto>>, ProblemResponse> {
    info!("REST request to get RecipeIngredients of Recipe {}", id);

    let items = recipes
        .ingredients_of(id)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(Json(
        items.into_iter().map(RecipeIngredientDto::from_model).collect(),
    ))
}

/// `PUT /api/recipes/{id}/recipe-ingredients/{ingredient_id}`
pub async fn attach_ingredient(
    Extension(recipes): Extension<Arc<RecipeService>>,
    Extension(ctx): Extension<RestContext>,
    Path((id, ingredient_id)): Path<(i64, i64)>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to attach RecipeIngredient {} to Recipe {}", ingredient_id, id);

    match recipes.attach_ingredient(id, ingredient_id).await {
        Ok(_) => Ok((
            StatusCode::NO_CONTENT,
            ctx.alert(EntityKind::RecipeIngredient, "updated", ingredient_id),
        )
            .into_response()),
        Err(e) => {
            error!("Failed to attach ingredient {} to recipe {}: {}", ingredient_id, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `DELETE /api/recipes/{id}/recipe-ingredients/{ingredient_id}`
pub async fn detach_ingredient(
    Extension(recipes): Extension<Arc<RecipeService>>,
    Extension(ctx): Extension<RestContext>,
    Path((id, ingredient_id)): Path<(i64, i64)>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to detach RecipeIngredient {} from Recipe {}", ingredient_id, id);

    match recipes.detach_ingredient(id, ingredient_id).await {
        Ok(_) => Ok((
            StatusCode::NO_CONTENT,
            ctx.alert(EntityKind::RecipeIngredient, "updated", ingredient_id),
        )
            .into_response()),
        Err(e) => {
            error!("Failed to detach ingredient {} from recipe {}: {}", ingredient_id, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}
