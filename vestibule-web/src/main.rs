//! Vestibule Web Server
//!
//! Registration, activation, authentication and profile management over a
//! relational store.

use clap::Parser;
use vestibule_core::AppConfig;
use vestibule_web::init_logging;

/// Vestibule web server
#[derive(Parser)]
#[command(name = "vestibule-web")]
#[command(about = "User registration and session service")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    std::env::set_var(
        "RUST_LOG",
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("vestibule_web={0},vestibule_app={0}", args.log_level)),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env()?;

    // Override with command line arguments
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    vestibule_web::server::run(config).await?;
    Ok(())
}
