//! Immutable snapshot of one captured HTTP request.
//!
//! A `CapturedRequest` is built once by the capture handler and never mutated
//! afterwards; the store shares it behind an `Arc`.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hyper::{HeaderMap, Method, Uri, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized representation of one inbound request at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub method: String,
    /// Path and query only; the authority lives in `host`.
    pub uri: String,
    pub proto: String,
    pub host: String,
    /// Repeated headers are flattened into one value joined with no
    /// separator. The lossy join is deliberate and must not be re-split.
    pub headers: BTreeMap<String, String>,
    #[serde(with = "body_base64")]
    pub body: Bytes,
    pub received_at: DateTime<Utc>,
}

impl CapturedRequest {
    /// Build a snapshot from the pieces of an in-flight hyper request.
    ///
    /// `body` must already be fully collected; the snapshot holds the same
    /// immutable buffer the response path reads from, so capturing never
    /// disturbs another reader of the bytes.
    pub fn from_parts(
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            method: method.to_string(),
            uri: request_target(uri),
            proto: proto_string(version),
            host: host_of(uri, headers),
            headers: flatten_headers(headers),
            body,
            received_at: Utc::now(),
        }
    }
}

/// Path plus query, as sent on the request line.
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn proto_string(version: Version) -> String {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
    .to_string()
}

/// The `Host` header, falling back to the URI authority for clients that
/// send an absolute-form request target.
fn host_of(uri: &Uri, headers: &HeaderMap) -> String {
    headers
        .get(hyper::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for key in headers.keys() {
        // Host is promoted to its own field, not repeated here.
        if key == &hyper::header::HOST {
            continue;
        }
        let joined: String = headers
            .get_all(key)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        flat.insert(key.as_str().to_string(), joined);
    }
    flat
}

impl fmt::Display for CapturedRequest {
    /// Multi-line console rendering: request line, host, headers sorted by
    /// name with values trimmed, then the body when non-empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.method, self.uri, self.proto)?;
        writeln!(f, "Host: {}", self.host)?;

        for (key, value) in &self.headers {
            writeln!(f, "{}: {}", key, value.trim())?;
        }

        if !self.body.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", String::from_utf8_lossy(&self.body))?;
        }

        Ok(())
    }
}

/// Serialize snapshot bodies as base64 strings so arbitrary byte payloads
/// stay JSON-safe.
mod body_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
