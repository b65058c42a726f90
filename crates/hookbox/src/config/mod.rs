//! Runtime configuration for the two listeners and the store.

pub mod routes;

#[allow(unused_imports)]
pub use routes::{load_rules, RouteRule, RuleRequest, RuleResponse};

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::Duration;

/// Header read deadline applied to both listeners.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on buffered header bytes per connection.
pub const MAX_HEADER_BYTES: usize = 1 << 20;

/// Retention policy for captured requests.
#[derive(Debug, Clone, Copy)]
pub struct Retention {
    /// How long an entry stays retrievable after insertion.
    pub ttl: Duration,
    /// How often the sweeper scans for expired entries. Lookups filter by
    /// deadline themselves, so correctness never depends on the sweep.
    pub sweep_interval: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(600),
        }
    }
}

/// Generate a management API key when none was configured.
pub fn generate_api_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
