//! Basic usage example

use configrant::Configrant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Configrant)]
struct Config {
    // Loaded from DATABASE_URL, no default
    #[cfgrant("env:DATABASE_URL")]
    pub database_url: String,

    // Environment first, then the default
    #[cfgrant("env:SERVER_ADDR,default:127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type
    #[cfgrant("default:10")]
    pub max_connections: u32,

    // Boolean type
    #[cfgrant("env:DEBUG_MODE,default:false")]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=configrant=debug shows which source each field came from
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");

    // Load configuration
    let mut config = Config::default();
    config.configure()?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}
