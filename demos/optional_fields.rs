//! Example demonstrating Option<T> and Box<T> fields

use configrant::{Args, Configrant};

#[derive(Debug, Default, Configrant)]
struct TlsConfig {
    #[cfgrant("env:TLS_CERT,default:/etc/ssl/cert.pem")]
    pub cert_path: String,

    #[cfgrant("env:TLS_KEY,default:/etc/ssl/key.pem")]
    pub key_path: String,
}

#[derive(Debug, Default, Configrant)]
struct Config {
    #[cfgrant("env:APP_NAME,default:my-application")]
    pub app_name: String,

    // Allocated and bound like a plain String
    #[cfgrant("env:OWNER,default:James")]
    pub owner: Option<String>,

    // Allocated as well, but nothing sets it: Some(0)
    pub port: Option<u16>,

    // Excluded fields stay None
    #[cfgrant("-")]
    pub api_key: Option<String>,

    // Optional nested records are allocated and walked
    pub tls: Option<TlsConfig>,

    #[cfgrant("env:RETRIES,default:3")]
    pub retries: Box<u32>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("OWNER", "Ronald");

    let mut config = Config::default();
    config.configure_with(&Args::default())?;

    println!("Configuration:");
    println!("  App Name: {}", config.app_name);
    println!("  Owner: {:?}", config.owner); // Some("Ronald")
    println!("  Port: {:?}", config.port); // Some(0)
    println!("  API Key: {:?}", config.api_key); // None
    println!("  TLS: {:?}", config.tls);
    println!("  Retries: {}", config.retries);

    Ok(())
}
