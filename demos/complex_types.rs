//! Example demonstrating sequences, maps and durations

use configrant::{Args, Configrant};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Default, Configrant)]
struct Config {
    // Sequence items are separated by ';'
    #[cfgrant("env:ALLOWED_HOSTS,default:localhost;127.0.0.1")]
    pub allowed_hosts: Vec<String>,

    #[cfgrant("default:1;2;3;4;5")]
    pub bytes: Vec<u8>,

    // Map entries are key:value, separated by ';'
    #[cfgrant("env:WEIGHTS,default:primary:3;replica:1")]
    pub weights: HashMap<String, u32>,

    #[cfgrant("default:read:0x1;write:0x2")]
    pub permissions: BTreeMap<String, u8>,

    #[cfgrant("default:100ms;1s;1m")]
    pub backoff: Vec<Duration>,

    #[cfgrant("env:RATIO,default:0.75")]
    pub ratio: f64,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("ALLOWED_HOSTS", "example.com;api.example.com");
    std::env::set_var("WEIGHTS", "primary:5;replica:2;backup:1");

    let mut config = Config::default();
    config.configure_with(&Args::default())?;

    println!("Configuration:");
    println!("  Allowed hosts: {:?}", config.allowed_hosts);
    println!("  Bytes: {:?}", config.bytes);
    println!("  Weights: {:?}", config.weights);
    println!("  Permissions: {:?}", config.permissions);
    println!("  Backoff: {:?}", config.backoff);
    println!("  Ratio: {}", config.ratio);

    // A malformed entry aborts the whole pass
    std::env::set_var("WEIGHTS", "primary=5");
    let mut broken = Config::default();
    if let Err(e) = broken.configure_with(&Args::default()) {
        println!("Rejected: {e}");
    }
    assert!(broken.allowed_hosts.is_empty());

    Ok(())
}
