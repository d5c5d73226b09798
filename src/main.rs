use distributed_fs::config::ProbeConfig;
use distributed_fs::probe::responder::{LoadResponder, ProcLoadAvg};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = ProbeConfig::from_env();

    let mut bind_addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: {} [--bind <addr:port>]", args[0]);
                eprintln!("Example: {} --bind 0.0.0.0:600", args[0]);
                std::process::exit(0);
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
                i += 1;
            }
        }
    }

    let responder = LoadResponder::bind(bind_addr, Arc::new(ProcLoadAvg)).await?;
    tracing::info!("Load agent listening on {}", responder.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    let handle = responder.start();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down load agent");
        }
        result = handle => {
            if let Err(e) = result {
                tracing::error!("Load responder stopped: {}", e);
            }
        }
    }

    Ok(())
}
