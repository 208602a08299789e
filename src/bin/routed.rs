//! The routing server binary.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wayfarer::facade::DataFacade;
use wayfarer::plugins::{BaseRoutePlugin, HelloPlugin, NodeIdPlugin, PluginRegistry};
use wayfarer::server::{shutdown_signal, RequestHandler, RoutingServer};

#[derive(Parser)]
#[command(name = "wayfarer-routed")]
#[command(about = "HTTP routing server over a prepared edge-expanded graph", long_about = None)]
#[command(version)]
struct Args {
    /// Path prefix of the prepared data (the original .osrm file)
    base: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    ip: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Requested number of worker threads
    #[arg(long, default_value_t = 8)]
    threads: usize,

    /// Load data from shared memory instead of files
    #[arg(long)]
    sharedmemory: bool,

    /// Quit after successful initialization
    #[arg(long)]
    trial: bool,
}

fn run(args: Args) -> Result<()> {
    let hardware_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let worker_threads = args.threads.clamp(1, hardware_threads);

    tracing::info!("starting up engines, wayfarer {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Threads:\t{}", worker_threads);
    tracing::debug!("IP address:\t{}", args.ip);
    tracing::debug!("IP port:\t{}", args.port);

    if args.sharedmemory {
        tracing::warn!("shared memory loading is not available, falling back to file load");
    }

    let facade = Arc::new(DataFacade::load(&args.base)?);

    let mut registry = PluginRegistry::new();
    registry.register(Box::new(HelloPlugin::new(facade.clone())));
    registry.register(Box::new(NodeIdPlugin::new(facade.clone())));
    registry.register(Box::new(BaseRoutePlugin::new(facade.clone())));
    let handler = Arc::new(RequestHandler::new(registry));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    let outcome: Result<()> = runtime.block_on(async {
        let server = RoutingServer::bind(&args.ip, args.port, handler).await?;
        tracing::info!("http 1.1 compression handled by flate2");

        if args.trial {
            tracing::info!("trial run, quitting after successful initialization");
            return Ok(());
        }

        tracing::info!("running and waiting for requests");
        tokio::select! {
            _ = server.run() => {}
            _ = shutdown_signal() => {
                tracing::info!("initiating shutdown");
            }
        }
        Ok(())
    });

    // in-flight handlers get two seconds, then the workers are abandoned
    tracing::info!("stopping threads");
    runtime.shutdown_timeout(Duration::from_secs(2));
    tracing::info!("shutdown completed");
    outcome
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(error) = run(args) {
        tracing::warn!("{:#}", error);
        std::process::exit(1);
    }
}
