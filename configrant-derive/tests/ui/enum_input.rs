#![allow(dead_code)]

// Enums have no named fields to bind
use configrant::Configrant;

#[derive(Configrant)]
enum Config {
    Local,
    Remote,
}

fn main() {}
