//! Route dispatch and authentication for the Management API.
//!
//! Every request is authenticated before any route is evaluated; an
//! unauthenticated caller cannot probe which ids exist.

use crate::admin_api::handlers;
use crate::admin_api::types::{error_response, not_found, unauthorized};
use crate::store::RequestStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{header, HeaderMap, Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Parsed `/requests` route
enum RequestsRoute {
    /// GET/DELETE /requests
    Collection,
    /// GET/DELETE /requests/{id}
    ById(Uuid),
    /// A single non-empty segment that is not a well-formed id
    MalformedId,
}

impl RequestsRoute {
    /// Parse the path portion after the leading `/requests`.
    fn parse(rest: &str) -> Option<Self> {
        match rest {
            "" => Some(RequestsRoute::Collection),
            segment if segment.contains('/') => None,
            segment => Some(
                Uuid::parse_str(segment)
                    .map(RequestsRoute::ById)
                    .unwrap_or(RequestsRoute::MalformedId),
            ),
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    store: Arc<RequestStore>,
    api_key: Arc<str>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("management api: {} {}", method, path);

    if !is_authorized(req.headers(), &api_key) {
        return Ok(unauthorized());
    }

    Ok(route_by_path(&method, &path, &store))
}

/// The credential must equal the configured key exactly; anything else,
/// including an unreadable header value, is rejected.
fn is_authorized(headers: &HeaderMap, api_key: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == api_key)
}

/// Route based on path
fn route_by_path(method: &Method, path: &str, store: &RequestStore) -> Response<Full<Bytes>> {
    let rest = match path.strip_prefix("/requests") {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            // e.g. /requestsfoo
            None => return not_found(),
        },
        None => return not_found(),
    };

    match RequestsRoute::parse(rest) {
        Some(RequestsRoute::Collection) => match *method {
            Method::GET => handlers::handle_list(store),
            Method::DELETE => handlers::handle_flush(store),
            _ => not_found(),
        },
        Some(RequestsRoute::ById(id)) => match *method {
            Method::GET => handlers::handle_get(store, id),
            Method::DELETE => handlers::handle_delete(store, id),
            _ => not_found(),
        },
        Some(RequestsRoute::MalformedId) => {
            error_response(StatusCode::BAD_REQUEST, "invalid request id")
        }
        None => not_found(),
    }
}
