//! Management API server.

use crate::admin_api::router::route_request;
use crate::config::{HEADER_READ_TIMEOUT, MAX_HEADER_BYTES};
use crate::store::RequestStore;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Token-protected HTTP surface over the store.
pub struct AdminApiServer {
    addr: SocketAddr,
    store: Arc<RequestStore>,
    api_key: Arc<str>,
}

impl AdminApiServer {
    /// Create a new management API server
    pub fn new(addr: SocketAddr, store: Arc<RequestStore>, api_key: Arc<str>) -> Self {
        Self {
            addr,
            store,
            api_key,
        }
    }

    /// Run the management API server
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("management api listening on http://{}", self.addr);

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let store = Arc::clone(&self.store);
            let api_key = Arc::clone(&self.api_key);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let store = Arc::clone(&store);
                    let api_key = Arc::clone(&api_key);
                    async move { route_request(req, store, api_key).await }
                });

                if let Err(e) = http1::Builder::new()
                    .timer(TokioTimer::new())
                    .header_read_timeout(HEADER_READ_TIMEOUT)
                    .max_buf_size(MAX_HEADER_BYTES)
                    .serve_connection(io, service)
                    .await
                {
                    debug!("management api connection error: {}", e);
                }
            });
        }
    }
}
