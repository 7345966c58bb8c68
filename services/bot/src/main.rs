use anyhow::{Context, Result};
use clap::Parser;
use guildmint_bot::{now_ms, router, Service, ServiceConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host interface to bind (default: localhost).
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(short, long, default_value_t = 8484)]
    port: u16,

    /// Hex-encoded 32-byte secret that seeds game randomness.
    #[arg(long)]
    secret: String,

    /// Path to the record snapshot (state is in-memory only when omitted).
    #[arg(long)]
    snapshot_path: Option<PathBuf>,

    /// How often the sweep refunds timed-out blackjack hands, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    sweep_interval_ms: u64,
}

fn parse_secret(raw: &str) -> Result<[u8; 32]> {
    let raw = raw.trim();
    if raw.len() != 64 {
        anyhow::bail!("secret must be 64 hex characters, got {}", raw.len());
    }
    let mut secret = [0u8; 32];
    for (idx, pair) in raw.as_bytes().chunks_exact(2).enumerate() {
        secret[idx] = std::str::from_utf8(pair)
            .ok()
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .with_context(|| format!("secret has a non-hex digit at offset {}", idx * 2))?;
    }
    Ok(secret)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let secret = parse_secret(&args.secret).context("--secret")?;
    if args.sweep_interval_ms == 0 {
        anyhow::bail!("--sweep-interval-ms must be greater than zero");
    }

    let service = Arc::new(
        Service::init(ServiceConfig {
            secret,
            snapshot_path: args.snapshot_path.clone(),
        })
        .await?,
    );

    // Session sweep
    let sweeper = service.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(args.sweep_interval_ms));
        loop {
            interval.tick().await;
            if let Err(err) = sweeper.expire_due_sessions(now_ms()).await {
                warn!(?err, "session sweep failed");
            }
        }
    });

    let app = router(service);
    let addr = SocketAddr::from((args.host, args.port));
    info!(%addr, "guildmint bot service listening");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .context("bind listen addr")?,
        app,
    )
    .await?;
    Ok(())
}
