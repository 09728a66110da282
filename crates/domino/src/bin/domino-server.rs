use clap::Parser;
use domino::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Authoritative domino game server")]
struct Args {
    /// IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "50051")]
    port: u16,

    /// Players needed before the game starts
    #[arg(short, long, default_value = "3")]
    capacity: usize,

    /// Seed for a reproducible shuffle and color rotation
    #[arg(short, long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.capacity == 0 {
        return Err("capacity must be at least 1".into());
    }

    let mut builder = DominoServer::builder()
        .bind(&format!("{}:{}", args.host, args.port))
        .game_config(GameConfig {
            capacity: args.capacity,
            ..GameConfig::default()
        });
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let server = builder.build().await?;
    tracing::info!(addr = %server.local_addr()?, capacity = args.capacity, "waiting for players");
    server.run().await?;
    Ok(())
}
