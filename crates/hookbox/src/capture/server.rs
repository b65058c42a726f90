//! Public capture listener.

use crate::capture::handler::handle_capture;
use crate::config::{HEADER_READ_TIMEOUT, MAX_HEADER_BYTES};
use crate::matcher::RouteTable;
use crate::snapshot::CapturedRequest;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Public-facing HTTP endpoint that accepts any method on any path.
pub struct CaptureServer {
    addr: SocketAddr,
    routes: Arc<RouteTable>,
    captures: mpsc::Sender<CapturedRequest>,
}

impl CaptureServer {
    /// Create a new capture server
    pub fn new(
        addr: SocketAddr,
        routes: Arc<RouteTable>,
        captures: mpsc::Sender<CapturedRequest>,
    ) -> Self {
        Self {
            addr,
            routes,
            captures,
        }
    }

    /// Run the capture server
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("capture listener on http://{}", self.addr);

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let routes = Arc::clone(&self.routes);
            let captures = self.captures.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let routes = Arc::clone(&routes);
                    let captures = captures.clone();
                    async move { handle_capture(req, routes, captures).await }
                });

                if let Err(e) = http1::Builder::new()
                    .timer(TokioTimer::new())
                    .header_read_timeout(HEADER_READ_TIMEOUT)
                    .max_buf_size(MAX_HEADER_BYTES)
                    .serve_connection(io, service)
                    .await
                {
                    debug!("capture connection error: {}", e);
                }
            });
        }
    }
}
