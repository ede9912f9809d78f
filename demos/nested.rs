//! Example demonstrating nested configuration records

use configrant::{Args, Configrant};

#[derive(Debug, Default, Configrant)]
struct DatabaseConfig {
    #[cfgrant("env:DB_HOST,default:localhost")]
    pub host: String,

    #[cfgrant("env:DB_PORT,default:5432")]
    pub port: u16,

    #[cfgrant("env:DB_USERNAME,default:postgres")]
    pub user_name: String,

    // Never bound
    #[cfgrant(skip)]
    pub password: String,
}

#[derive(Debug, Default, Configrant)]
struct ServerConfig {
    #[cfgrant(arg = "--listen", default = "0.0.0.0:8080")]
    pub listen: String,

    #[cfgrant(default = "4")]
    pub workers: usize,
}

#[derive(Debug, Default, Configrant)]
struct Config {
    #[cfgrant("env:APP_NAME,default:nested-demo")]
    pub name: String,

    // Nested records need no tag of their own
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("DB_HOST", "db.internal");

    let mut config = Config::default();
    config.configure_with(&Args::parse(["--listen=127.0.0.1:9000"]))?;
    println!("{config:#?}");

    // Errors name the dotted field path and the source
    std::env::set_var("DB_PORT", "not-a-port");
    let mut broken = Config::default();
    if let Err(e) = broken.configure_with(&Args::default()) {
        println!("Error: {e}");
    }

    Ok(())
}
