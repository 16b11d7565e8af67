use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header::LOCATION, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use http_problem::ProblemResponse;
use tracing::{error, info};

use super::{location, paged};
use crate::api::rest::dto::{PageParams, RestDto};
use crate::api::rest::extract::{ApiJson, MergePatch};
use crate::api::rest::RestContext;
use crate::domain::service::CrudService;
use crate::domain::Record;

type Svc<D> = Extension<Arc<CrudService<<D as RestDto>::Model>>>;

fn kind<D: RestDto>() -> crate::contract::model::EntityKind {
    <D::Model as Record>::KIND
}

/// `POST /api/{entity}`
pub async fn create<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    uri: Uri,
    ApiJson(body): ApiJson<D>,
) -> Result<Response, ProblemResponse> {
    let kind = kind::<D>();
    info!("REST request to save {}", kind);

    let record = body.into_model().map_err(|e| ctx.problem(&e, uri.path()))?;
    match svc.create(record).await {
        Ok(saved) => {
            let id = saved.id().unwrap_or_default();
            let mut headers = ctx.alert(kind, "created", id);
            if let Some(loc) = location(kind.path(), id) {
                headers.insert(LOCATION, loc);
            }
            Ok((StatusCode::CREATED, headers, Json(D::from_model(saved))).into_response())
        }
        Err(e) => {
            error!("Failed to create {}: {}", kind, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `PUT /api/{entity}/{id}`
pub async fn update<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    Path(id): Path<i64>,
    uri: Uri,
    ApiJson(body): ApiJson<D>,
) -> Result<Response, ProblemResponse> {
    let kind = kind::<D>();
    info!("REST request to update {} {}", kind, id);

    let record = body.into_model().map_err(|e| ctx.problem(&e, uri.path()))?;
    match svc.update(id, record).await {
        Ok(saved) => {
            let headers = ctx.alert(kind, "updated", id);
            Ok((headers, Json(D::from_model(saved))).into_response())
        }
        Err(e) => {
            error!("Failed to update {} {}: {}", kind, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `PATCH /api/{entity}/{id}` with `application/merge-patch+json`
pub async fn partial_update<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    Path(id): Path<i64>,
    uri: Uri,
    MergePatch(body): MergePatch<D>,
) -> Result<Response, ProblemResponse> {
    let kind = kind::<D>();
    info!("REST request to partially update {} {}", kind, id);

    let body_id = body.body_id();
    let patch = body.into_patch().map_err(|e| ctx.problem(&e, uri.path()))?;
    match svc.partial_update(id, body_id, patch).await {
        Ok(saved) => {
            let headers = ctx.alert(kind, "updated", id);
            Ok((headers, Json(D::from_model(saved))).into_response())
        }
        Err(e) => {
            error!("Failed to patch {} {}: {}", kind, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `GET /api/{entity}?page=&size=`
pub async fn list<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to get a page of {}", kind::<D>());

    let req = svc.config().page_request(params.page, params.size);
    let page = svc
        .find_all(req)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(paged(&uri, page, D::from_model))
}

/// `GET /api/{entity}/{id}`
pub async fn get_one<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Json<D>, ProblemResponse> {
    info!("REST request to get {} {}", kind::<D>(), id);

    svc.find_one(id)
        .await
        .map(|m| Json(D::from_model(m)))
        .map_err(|e| ctx.problem(&e, uri.path()))
}

/// `DELETE /api/{entity}/{id}`; 204 whether or not the record existed.
pub async fn delete<D: RestDto>(
    Extension(svc): Svc<D>,
    Extension(ctx): Extension<RestContext>,
    Path(id): Path<i64>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    let kind = kind::<D>();
    info!("REST request to delete {} {}", kind, id);

    match svc.delete(id).await {
        Ok(()) => Ok((StatusCode::NO_CONTENT, ctx.alert(kind, "deleted", id)).into_response()),
        Err(e) => {
            error!("Failed to delete {} {}: {}", kind, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}
