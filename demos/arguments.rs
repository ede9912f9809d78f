//! Example demonstrating command-line arguments
//!
//! Try: `cargo run --example arguments -- --port=9000 --verbose --timeout=1m30s`

use configrant::{Args, Configrant};
use std::time::Duration;

#[derive(Debug, Default, Configrant)]
struct Config {
    // Argument wins over the environment, which wins over the default
    #[cfgrant("arg:--port,env:PORT,default:8080")]
    pub port: u16,

    // A bare `--verbose` reads as `true`
    #[cfgrant("arg:--verbose,default:false")]
    pub verbose: bool,

    #[cfgrant("arg:--timeout,default:30s")]
    pub timeout: Duration,

    // Values set before binding are kept
    #[cfgrant("arg:--name,default:worker")]
    pub name: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::from_env();
    println!("Parsed {} argument(s)", args.len());

    let mut config = Config {
        name: "preset".to_string(),
        ..Default::default()
    };
    config.configure_with(&args)?;

    println!("Configuration:");
    println!("  Port: {}", config.port);
    println!("  Verbose: {}", config.verbose);
    println!("  Timeout: {:?}", config.timeout);
    println!("  Name: {}", config.name); // always "preset"

    Ok(())
}
