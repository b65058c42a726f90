//! Mock route rule file loading.
//!
//! The routes file is an ordered list of rules; declaration order is the
//! match order. JSON and YAML are selected by file extension, anything else
//! is a fatal configuration error.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One operator-defined mapping from a request pattern to a canned response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteRule {
    pub request: RuleRequest,
    pub response: RuleResponse,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleRequest {
    /// Regular expression matched anywhere in the request's path+query.
    pub uri: String,
    /// Regular expression matched against the HTTP method.
    pub method: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RuleResponse {
    /// Raw JSON payload returned verbatim.
    #[serde(default)]
    pub body: serde_json::Value,
    /// HTTP status code; 0 or absent means 200.
    #[serde(default)]
    pub status: u16,
}

/// Load the ordered rule list from a `.json`, `.yaml`, or `.yml` file.
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<Vec<RouteRule>, anyhow::Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read routes file {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let rules = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid YAML routes file {}", path.display()))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON routes file {}", path.display()))?,
        other => anyhow::bail!(
            "unsupported routes file extension '{other}' for {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    };

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_json_rules() {
        let path = write_temp(
            "hookbox_rules_test.json",
            r#"[
                {
                    "request": {"uri": "^/orders$", "method": "^GET$"},
                    "response": {"body": {"ok": true}, "status": 201}
                },
                {
                    "request": {"uri": "/health", "method": "GET|HEAD"},
                    "response": {"body": "up"}
                }
            ]"#,
        );

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].request.uri, "^/orders$");
        assert_eq!(rules[0].response.status, 201);
        assert_eq!(rules[0].response.body, serde_json::json!({"ok": true}));
        // Status defaults to 0 when absent; the matcher maps it to 200.
        assert_eq!(rules[1].response.status, 0);
    }

    #[test]
    fn test_parse_yaml_rules() {
        let path = write_temp(
            "hookbox_rules_test.yaml",
            r#"
- request:
    uri: "^/payments"
    method: "^POST$"
  response:
    status: 202
    body:
      accepted: true
"#,
        );

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].request.method, "^POST$");
        assert_eq!(rules[0].response.body, serde_json::json!({"accepted": true}));
    }

    #[test]
    fn test_unsupported_extension_is_fatal() {
        let path = write_temp("hookbox_rules_test.toml", "request = 1");
        let err = load_rules(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported routes file extension"));
    }

    #[test]
    fn test_missing_pattern_field_is_fatal() {
        let path = write_temp(
            "hookbox_rules_missing.json",
            r#"[{"request": {"uri": "/x"}, "response": {}}]"#,
        );
        assert!(load_rules(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(load_rules("/nonexistent/hookbox_routes.json").is_err());
    }
}
