//! Per-request capture logic for the public listener.

use crate::admin_api::types::{build_response, error_response};
use crate::matcher::RouteTable;
use crate::snapshot::CapturedRequest;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Handle one inbound hook delivery.
///
/// Every request is captured regardless of match outcome, and the caller
/// always receives a response: the first matching rule's canned reply, or an
/// empty 200. A capture-pipeline failure is logged, never surfaced to the
/// caller.
pub async fn handle_capture(
    req: Request<Incoming>,
    routes: Arc<RouteTable>,
    captures: mpsc::Sender<CapturedRequest>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let headers = req.headers().clone();

    // Bodies are expected test-sized; collect fully before snapshotting.
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("failed to read request body: {e}");
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "failed to read request body",
            ));
        }
    };

    let snapshot = CapturedRequest::from_parts(&method, &uri, version, &headers, body);
    let target = snapshot.uri.clone();

    // Guaranteed enqueue: wait for queue capacity rather than dropping the
    // capture. Fails only when the ingest loop is gone.
    if let Err(e) = captures.send(snapshot).await {
        error!("capture queue unavailable, snapshot lost: {e}");
    }

    match routes.find_response(method.as_str(), &target) {
        Some(mock) => Ok(build_response(mock.status, mock.body.clone())),
        None => Ok(build_response(StatusCode::OK, Bytes::new())),
    }
}
