//! HTTP handlers. The CRUD set is generic over the entity DTO; the rest
//! cover product units, recipe ingredients, ownership filters and users.

pub mod crud;
pub mod grocery_items;
pub mod products;
pub mod recipes;
pub mod users;

use axum::{http::HeaderValue, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use crate::api::rest::headers;
use crate::domain::page::Page;

/// List body with `X-Total-Count` and `Link` headers.
fn paged<T, D: Serialize>(uri: &axum::http::Uri, page: Page<T>, f: impl FnMut(T) -> D) -> Response {
    let headers = headers::pagination(uri, &page);
    let body: Vec<D> = page.items.into_iter().map(f).collect();
    (headers, Json(body)).into_response()
}

fn location(path: &str, id: i64) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("/api/{path}/{id}")).ok()
}
