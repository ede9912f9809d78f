#![allow(dead_code)]

// Fields are bound by name, so tuple structs are rejected
use configrant::Configrant;

#[derive(Configrant)]
struct Config(pub String, pub u16);

fn main() {}
