#![allow(dead_code)]

// Only arg, env, default and skip are accepted
use configrant::Configrant;

#[derive(Configrant)]
struct Config {
    #[cfgrant(name = "x")]
    pub value: String,
}

fn main() {}
