//! Entity alert headers and pagination headers.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};

use crate::contract::model::EntityKind;
use crate::domain::page::Page;

pub const X_TOTAL_COUNT: &str = "x-total-count";

/// `X-{app}-{suffix}`; `None` if the configured app name is not a valid token.
pub fn app_header(app: &str, suffix: &str) -> Option<HeaderName> {
    HeaderName::try_from(format!("X-{app}-{suffix}")).ok()
}

fn insert(headers: &mut HeaderMap, name: Option<HeaderName>, value: &str) {
    if let (Some(name), Ok(value)) = (name, HeaderValue::from_str(value)) {
        headers.insert(name, value);
    }
}

/// `X-{app}-alert: {app}.{entity}.{action}` plus `X-{app}-params: {param}`.
pub fn entity_alert(app: &str, entity: EntityKind, action: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        app_header(app, "alert"),
        &format!("{app}.{}.{action}", entity.name()),
    );
    insert(&mut headers, app_header(app, "params"), param);
    headers
}

/// `X-Total-Count` and an RFC 8288 `Link` header for `page`.
///
/// Links keep every query parameter of `uri` except `page` and `size`.
pub fn pagination<T>(uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(page.total));

    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("page=") && !p.starts_with("size="))
        .collect();
    let link = |n: u64, rel: &str| {
        let page_param = format!("page={n}");
        let size_param = format!("size={}", page.size);
        let mut query = kept.clone();
        query.push(&page_param);
        query.push(&size_param);
        format!("<{}?{}>; rel=\"{rel}\"", uri.path(), query.join("&"))
    };

    let mut links = Vec::with_capacity(4);
    if page.has_next() {
        links.push(link(page.page.saturating_add(1), "next"));
    }
    if page.has_previous() {
        links.push(link(page.page - 1, "prev"));
    }
    links.push(link(page.total_pages() - 1, "last"));
    links.push(link(0, "first"));

    if let Ok(v) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(axum::http::header::LINK, v);
    }
    headers
}
