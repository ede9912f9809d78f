#![allow(dead_code)]

// Every tag option needs a key and a value
use configrant::Configrant;

#[derive(Configrant)]
struct Config {
    #[cfgrant("env:X,default")]
    pub value: String,
}

fn main() {}
