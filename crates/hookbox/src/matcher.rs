//! Ordered mock-route table evaluated against every captured request.

use crate::config::routes::RouteRule;
use anyhow::Context;
use bytes::Bytes;
use hyper::StatusCode;
use regex::Regex;

/// One rule compiled for matching.
pub struct CompiledRoute {
    uri: Regex,
    method: Regex,
    response: MockResponse,
}

/// The canned response a matching rule fabricates.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Rules in declaration order; the first match wins, so earlier rules shadow
/// later overlapping ones.
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile the rule list. Empty or invalid patterns and out-of-range
    /// status codes are configuration errors that abort startup.
    pub fn compile(rules: &[RouteRule]) -> Result<Self, anyhow::Error> {
        let mut routes = Vec::with_capacity(rules.len());

        for (index, rule) in rules.iter().enumerate() {
            if rule.request.uri.is_empty() {
                anyhow::bail!("route {index} is missing a URI pattern");
            }
            if rule.request.method.is_empty() {
                anyhow::bail!("route {index} is missing a method pattern");
            }

            let uri = Regex::new(&rule.request.uri)
                .with_context(|| format!("invalid URI pattern in route {index}"))?;
            let method = Regex::new(&rule.request.method)
                .with_context(|| format!("invalid method pattern in route {index}"))?;

            let raw_status = if rule.response.status == 0 {
                200
            } else {
                rule.response.status
            };
            let status = StatusCode::from_u16(raw_status)
                .with_context(|| format!("invalid response status in route {index}"))?;

            let body = match &rule.response.body {
                serde_json::Value::Null => Bytes::new(),
                value => Bytes::from(serde_json::to_vec(value)?),
            };

            routes.push(CompiledRoute {
                uri,
                method,
                response: MockResponse { status, body },
            });
        }

        Ok(Self { routes })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the canned response for a request, front to back.
    ///
    /// URI patterns use partial-match semantics over the raw path+query;
    /// callers anchor with `^`/`$` in the pattern itself when they want
    /// full-string matching. Returns `None` when no rule applies.
    pub fn find_response(&self, method: &str, uri: &str) -> Option<&MockResponse> {
        self.routes
            .iter()
            .find(|route| route.uri.is_match(uri) && route.method.is_match(method))
            .map(|route| &route.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::routes::{RuleRequest, RuleResponse};
    use serde_json::json;

    fn rule(uri: &str, method: &str, status: u16, body: serde_json::Value) -> RouteRule {
        RouteRule {
            request: RuleRequest {
                uri: uri.to_string(),
                method: method.to_string(),
            },
            response: RuleResponse { body, status },
        }
    }

    #[test]
    fn test_basic_match() {
        let table =
            RouteTable::compile(&[rule("^/orders$", "^GET$", 201, json!({"ok": true}))]).unwrap();

        let matched = table.find_response("GET", "/orders").unwrap();
        assert_eq!(matched.status, StatusCode::CREATED);
        assert_eq!(matched.body.as_ref(), br#"{"ok":true}"#);

        assert!(table.find_response("POST", "/orders").is_none());
        assert!(table.find_response("GET", "/orders/1").is_none());
    }

    #[test]
    fn test_partial_uri_match() {
        let table = RouteTable::compile(&[rule("orders", "GET", 0, json!(null))]).unwrap();

        // Unanchored patterns match anywhere in the path+query.
        assert!(table.find_response("GET", "/api/orders/42").is_some());
        assert!(table.find_response("GET", "/search?q=orders").is_some());
        assert!(table.find_response("GET", "/payments").is_none());
    }

    #[test]
    fn test_method_pattern_alternation() {
        let table = RouteTable::compile(&[rule("^/x$", "^(GET|HEAD)$", 0, json!(null))]).unwrap();

        assert!(table.find_response("GET", "/x").is_some());
        assert!(table.find_response("HEAD", "/x").is_some());
        assert!(table.find_response("DELETE", "/x").is_none());
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let table = RouteTable::compile(&[
            rule("^/dup$", "GET", 200, json!("first")),
            rule("^/dup$", "GET", 500, json!("second")),
            rule("/dup", ".*", 503, json!("third")),
        ])
        .unwrap();

        let matched = table.find_response("GET", "/dup").unwrap();
        assert_eq!(matched.status, StatusCode::OK);
        assert_eq!(matched.body.as_ref(), br#""first""#);
    }

    #[test]
    fn test_status_zero_defaults_to_200() {
        let table = RouteTable::compile(&[rule("^/x$", "GET", 0, json!(null))]).unwrap();
        assert_eq!(table.find_response("GET", "/x").unwrap().status, StatusCode::OK);
    }

    #[test]
    fn test_null_body_is_empty() {
        let table = RouteTable::compile(&[rule("^/x$", "GET", 0, json!(null))]).unwrap();
        assert!(table.find_response("GET", "/x").unwrap().body.is_empty());
    }

    #[test]
    fn test_invalid_uri_pattern_is_fatal() {
        assert!(RouteTable::compile(&[rule("[invalid(", "GET", 0, json!(null))]).is_err());
    }

    #[test]
    fn test_invalid_method_pattern_is_fatal() {
        assert!(RouteTable::compile(&[rule("/x", "(GET", 0, json!(null))]).is_err());
    }

    #[test]
    fn test_empty_patterns_are_fatal() {
        assert!(RouteTable::compile(&[rule("", "GET", 0, json!(null))]).is_err());
        assert!(RouteTable::compile(&[rule("/x", "", 0, json!(null))]).is_err());
    }

    #[test]
    fn test_out_of_range_status_is_fatal() {
        assert!(RouteTable::compile(&[rule("/x", "GET", 99, json!(null))]).is_err());
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table = RouteTable::compile(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.find_response("GET", "/anything").is_none());
    }
}
