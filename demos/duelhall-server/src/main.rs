//! Runs a Duelhall server.
//!
//! ```text
//! duelhall-server [config.json]
//! ```
//!
//! The optional JSON file holds a `ServerConfig`; missing fields keep
//! their defaults. `DUELHALL_BIND` overrides the bind address and
//! `RUST_LOG` the log filter (default `info`).
//!
//! Ctrl-C stops every session and disconnects all clients.
//!
//! Play with any line-based client, e.g. `nc localhost 8081`, then send
//! `GAME:TIC_TAC_TOE`.

use std::error::Error;
use std::path::Path;

use duelhall::prelude::*;
use tracing_subscriber::EnvFilter;

fn load_config(path: Option<&Path>) -> Result<ServerConfig, Box<dyn Error>> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            serde_json::from_str(&raw).map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => ServerConfig::default(),
    };

    if let Ok(bind) = std::env::var("DUELHALL_BIND") {
        config.bind_addr = bind;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let path = std::env::args_os().nth(1);
    let config = load_config(path.as_deref().map(Path::new))?;

    tracing::info!(addr = %config.bind_addr, "starting duelhall server");

    let server = DuelhallServer::builder().config(config).build().await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "can't listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    tracing::info!("stopped");
    Ok(())
}
