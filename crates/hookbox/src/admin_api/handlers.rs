//! Handlers for the management operations over the store.

use crate::admin_api::types::{empty_response, error_response, json_response, StoredRequestBody};
use crate::store::{RequestStore, StoreError};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use tracing::debug;
use uuid::Uuid;

/// GET /requests — every live capture, keyed by id.
pub fn handle_list(store: &RequestStore) -> Response<Full<Bytes>> {
    let entries = store.list();
    debug!(count = entries.len(), "listing captured requests");

    let view: std::collections::HashMap<Uuid, &crate::snapshot::CapturedRequest> = entries
        .iter()
        .map(|(id, request)| (*id, request.as_ref()))
        .collect();
    json_response(StatusCode::OK, &view)
}

/// GET /requests/{id}
pub fn handle_get(store: &RequestStore, id: Uuid) -> Response<Full<Bytes>> {
    match store.get(id) {
        Ok(entry) => json_response(
            StatusCode::OK,
            &StoredRequestBody {
                id: entry.id,
                request: (*entry.request).clone(),
            },
        ),
        Err(StoreError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "captured request not found")
        }
    }
}

/// DELETE /requests/{id} — idempotent; absence is not an error.
pub fn handle_delete(store: &RequestStore, id: Uuid) -> Response<Full<Bytes>> {
    if store.delete(id) {
        debug!(%id, "captured request deleted");
    }
    empty_response(StatusCode::NO_CONTENT)
}

/// DELETE /requests
pub fn handle_flush(store: &RequestStore) -> Response<Full<Bytes>> {
    store.flush();
    debug!("captured requests flushed");
    empty_response(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::CapturedRequest;
    use hyper::{HeaderMap, Method, Version};
    use std::time::Duration;

    fn store_with_one() -> (RequestStore, Uuid) {
        let store = RequestStore::new(Duration::from_secs(300));
        let id = store.put(CapturedRequest::from_parts(
            &Method::POST,
            &"/hooks/github".parse().unwrap(),
            Version::HTTP_11,
            &HeaderMap::new(),
            Bytes::from_static(b"{}"),
        ));
        (store, id)
    }

    #[test]
    fn test_get_present_entry() {
        let (store, id) = store_with_one();
        let resp = handle_get(&store, id);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_get_absent_entry_is_404() {
        let (store, _) = store_with_one();
        let resp = handle_get(&store, Uuid::new_v4());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, id) = store_with_one();

        assert_eq!(handle_delete(&store, id).status(), StatusCode::NO_CONTENT);
        assert_eq!(handle_get(&store, id).status(), StatusCode::NOT_FOUND);
        // Second delete of the same id still succeeds.
        assert_eq!(handle_delete(&store, id).status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_flush_empties_store() {
        let (store, id) = store_with_one();

        assert_eq!(handle_flush(&store).status(), StatusCode::NO_CONTENT);
        assert!(store.is_empty());
        assert_eq!(handle_get(&store, id).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_list_returns_ok() {
        let (store, _) = store_with_one();
        assert_eq!(handle_list(&store).status(), StatusCode::OK);
    }
}
