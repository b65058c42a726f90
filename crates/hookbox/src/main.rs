//! Hookbox CLI entrypoint.

use clap::Parser;
use hookbox::admin_api::AdminApiServer;
use hookbox::capture::CaptureServer;
use hookbox::config::{self, Retention};
use hookbox::matcher::RouteTable;
use hookbox::store::{self, RequestStore, CAPTURE_QUEUE_CAPACITY};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hookbox", version)]
#[command(about = "Capture webhook deliveries and answer them with canned responses")]
struct Args {
    /// JSON or YAML file defining mock routes; runs with an empty rule
    /// table when omitted
    routes_file: Option<PathBuf>,

    /// Port for the public capture listener
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Port for the token-protected management API
    #[arg(long, default_value_t = 8090)]
    admin_port: u16,

    /// Management API key; generated at startup when omitted
    #[arg(long, env = "HOOKBOX_API_KEY")]
    api_key: Option<String>,

    /// Seconds a captured request stays retrievable
    #[arg(long, default_value_t = 300)]
    ttl_seconds: u64,

    /// Seconds between sweeps for expired captures
    #[arg(long, default_value_t = 600)]
    sweep_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let rules = match &args.routes_file {
        Some(path) => config::load_rules(path)?,
        None => Vec::new(),
    };
    let routes = Arc::new(RouteTable::compile(&rules)?);
    info!("loaded {} mock routes", routes.len());

    let api_key: Arc<str> = match args.api_key {
        Some(key) => key.into(),
        None => {
            let key = config::generate_api_key();
            info!("management api key: {key}");
            key.into()
        }
    };

    let retention = Retention {
        ttl: Duration::from_secs(args.ttl_seconds),
        sweep_interval: Duration::from_secs(args.sweep_seconds),
    };

    let store = Arc::new(RequestStore::new(retention.ttl));
    let (captures, queue) = mpsc::channel(CAPTURE_QUEUE_CAPACITY);

    tokio::spawn(store::run_ingest(Arc::clone(&store), queue));
    tokio::spawn(store::run_sweeper(
        Arc::clone(&store),
        retention.sweep_interval,
    ));

    let capture = CaptureServer::new(
        SocketAddr::from(([0, 0, 0, 0], args.port)),
        routes,
        captures,
    );
    let admin = AdminApiServer::new(
        SocketAddr::from(([0, 0, 0, 0], args.admin_port)),
        Arc::clone(&store),
        api_key,
    );

    tokio::select! {
        result = capture.run() => result?,
        result = admin.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    Ok(())
}
