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
use crate::api::rest::dto::{PageParams, ProductDto, RestDto};
use crate::api::rest::RestContext;
use crate::contract::model::{EntityKind, Product};
use crate::domain::service::{CrudService, ProductService};

/// `GET /api/products?eagerload=`; every listed product carries its unit set.
pub async fn list_products(
    Extension(crud): Extension<Arc<CrudService<Product>>>,
    Extension(svc): Extension<Arc<ProductService>>,
    Extension(ctx): Extension<RestContext>,
    Query(params): Query<PageParams>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!(eagerload = params.eagerload, "REST request to get a page of Products");

    let req = crud.config().page_request(params.page, params.size);
    let page = if params.eagerload {
        svc.find_all_eager(req).await
    } else {
        crud.find_all(req).await
    }
    .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(paged(&uri, page, ProductDto::from_model))
}

/// `PUT /api/products/{id}/product-units/{unit_id}`
pub async fn add_unit(
    Extension(svc): Extension<Arc<ProductService>>,
    Extension(ctx): Extension<RestContext>,
    Path((id, unit_id)): Path<(i64, i64)>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to add ProductUnit {} to Product {}", unit_id, id);

    match svc.add_unit(id, unit_id).await {
        Ok(()) => Ok((
            StatusCode::NO_CONTENT,
            ctx.alert(EntityKind::Product, "updated", id),
        )
            .into_response()),
        Err(e) => {
            error!("Failed to add unit {} to product {}: {}", unit_id, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `DELETE /api/products/{id}/product-units/{unit_id}`
pub async fn remove_unit(
    Extension(svc): Extension<Arc<ProductService>>,
    Extension(ctx): Extension<RestContext>,
    Path((id, unit_id)): Path<(i64, i64)>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    info!("REST request to remove ProductUnit {} from Product {}", unit_id, id);

    match svc.remove_unit(id, unit_id).await {
        Ok(()) => Ok((
            StatusCode::NO_CONTENT,
            ctx.alert(EntityKind::Product, "updated", id),
        )
            .into_response()),
        Err(e) => {
            error!("Failed to remove unit {} from product {}: {}", unit_id, id, e);
            Err(ctx.problem(&e, uri.path()))
        }
    }
}

/// `GET /api/product-units/{id}/products`
pub async fn products_of_unit(
    Extension(svc): Extension<Arc<ProductService>>,
    Extension(ctx): Extension<RestContext>,
    Path(unit_id): Path<i64>,
    uri: Uri,
) -> Result<Json<Vec<ProductDto>>, ProblemResponse> {
    info!("REST request to get Products of ProductUnit {}", unit_id);

    let products = svc
        .products_of_unit(unit_id)
        .await
        .map_err(|e| ctx.problem(&e, uri.path()))?;
    Ok(Json(products.into_iter().map(ProductDto::from_model).collect()))
}
